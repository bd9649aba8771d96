use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    /// The source cannot be decoded as a well-formed element tree. Fatal:
    /// aborts the run before any output is written.
    #[error("malformed model document: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("allow-list column {0:?} not found in header")]
    MissingColumn(String),
}

/// Collapse any XML-layer error into the fatal malformed-document case.
pub(crate) fn malformed(err: impl std::fmt::Display) -> IoError {
    IoError::Malformed(err.to_string())
}
