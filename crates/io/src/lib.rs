//! # Gridcarve I/O
//!
//! Thin I/O collaborators around the extraction core: RDF/XML reading and
//! writing for flat CIM model documents, and CSV loading of the seed-name
//! allow-list.
//!
//! The reader keeps element payload opaque — every attribute and text node it
//! does not interpret is carried through unchanged, so a selected element is
//! emitted exactly as it appeared in the source. The writer always renders
//! explicit open/close tags; downstream CIM tooling rejects self-closing
//! elements.

mod allowlist;
mod error;
mod reader;
mod writer;

pub use allowlist::{load_allow_list, AllowList, AllowListSpec, ColumnFilter};
pub use error::{IoError, Result};
pub use reader::{parse_model, read_model, ModelDocument};
pub use writer::{model_to_string, write_model};
