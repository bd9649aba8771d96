use crate::error::{IoError, Result};
use csv::StringRecord;
use std::collections::BTreeSet;
use std::path::Path;

/// Which columns of the allow-list table to read.
#[derive(Debug, Clone)]
pub struct AllowListSpec {
    /// Header of the column holding seed names.
    pub name_column: String,
    /// Optional row filter; rows whose filter column does not match the
    /// filter value contribute no name.
    pub filter: Option<ColumnFilter>,
}

#[derive(Debug, Clone)]
pub struct ColumnFilter {
    pub column: String,
    pub value: String,
}

impl Default for AllowListSpec {
    fn default() -> Self {
        Self {
            name_column: "ERCOT SUB NAME".to_string(),
            filter: None,
        }
    }
}

/// The loaded allow-list plus row accounting for the run report.
#[derive(Debug)]
pub struct AllowList {
    pub names: BTreeSet<String>,
    pub rows_total: usize,
    pub rows_selected: usize,
}

/// Load seed names from a CSV table.
///
/// Blank names are dropped; duplicates collapse. Column headers are matched
/// exactly after trimming.
pub fn load_allow_list(path: &Path, spec: &AllowListSpec) -> Result<AllowList> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let name_idx = column_index(&headers, &spec.name_column)?;
    let filter = spec
        .filter
        .as_ref()
        .map(|f| column_index(&headers, &f.column).map(|idx| (idx, f.value.as_str())))
        .transpose()?;

    let mut names = BTreeSet::new();
    let mut rows_total = 0;
    let mut rows_selected = 0;
    for record in reader.records() {
        let record = record?;
        rows_total += 1;
        if let Some((idx, value)) = filter {
            if record.get(idx).map(str::trim) != Some(value) {
                continue;
            }
        }
        rows_selected += 1;
        if let Some(name) = record.get(name_idx) {
            let name = name.trim();
            if !name.is_empty() {
                names.insert(name.to_string());
            }
        }
    }

    log::info!(
        "Loaded {} allow-listed names from {} ({rows_selected}/{rows_total} rows selected)",
        names.len(),
        path.display()
    );

    Ok(AllowList {
        names,
        rows_total,
        rows_selected,
    })
}

fn column_index(headers: &StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| IoError::MissingColumn(column.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const TABLE: &str = "\
ERCOT SUB NAME,ERCOT LOCATION
ALVIN,COAST
ANGLETON,COAST
ALVIN,COAST
PECOS,WEST
,COAST
";

    #[test]
    fn loads_all_names_without_filter() {
        let file = write_csv(TABLE);
        let list = load_allow_list(file.path(), &AllowListSpec::default()).unwrap();

        assert_eq!(list.rows_total, 5);
        assert_eq!(list.rows_selected, 5);
        // Duplicates collapse, blanks drop.
        let names: Vec<&str> = list.names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["ALVIN", "ANGLETON", "PECOS"]);
    }

    #[test]
    fn filter_selects_matching_rows_only() {
        let file = write_csv(TABLE);
        let spec = AllowListSpec {
            name_column: "ERCOT SUB NAME".to_string(),
            filter: Some(ColumnFilter {
                column: "ERCOT LOCATION".to_string(),
                value: "COAST".to_string(),
            }),
        };
        let list = load_allow_list(file.path(), &spec).unwrap();

        assert_eq!(list.rows_selected, 4);
        let names: Vec<&str> = list.names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["ALVIN", "ANGLETON"]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let file = write_csv(TABLE);
        let spec = AllowListSpec {
            name_column: "SUBSTATION".to_string(),
            filter: None,
        };
        let err = load_allow_list(file.path(), &spec).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn(c) if c == "SUBSTATION"));
    }
}
