use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};

// ---------------------------------------------------------------------------
// TrainingSchema – the predictor's input contract
// ---------------------------------------------------------------------------

/// Ordered column names fixed at training time.
///
/// Defines both the dimensionality and the feature order the predictor was
/// fit against. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSchema {
    columns: Vec<String>,
}

impl TrainingSchema {
    /// Build a schema, rejecting empty lists and duplicate names.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            bail!("Training schema has no columns");
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.as_str()) {
                bail!("Training schema lists column '{col}' more than once");
            }
        }
        Ok(TrainingSchema { columns })
    }

    /// Column names in training order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a training schema from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `["year", "id_1", "id_2", ...]`
/// * `.csv`  – a single header row holding the column names
///
/// Surrounding whitespace is stripped from every name in both formats.
pub fn load_schema(path: &Path) -> Result<TrainingSchema> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let columns = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    let columns = columns.into_iter().map(|c| c.trim().to_string()).collect();

    TrainingSchema::new(columns).with_context(|| format!("invalid schema in {}", path.display()))
}

fn load_json(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).context("reading schema JSON")?;
    serde_json::from_str(&text).context("Expected a JSON array of column names")
}

fn load_csv(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context("opening schema CSV")?;
    let headers = reader.headers().context("reading schema CSV header")?;
    Ok(headers.iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_json_array() {
        let file = write_temp(".json", r#"["year", "id_1", "id_2"]"#);
        let schema = load_schema(file.path()).unwrap();
        assert_eq!(schema.columns(), ["year", "id_1", "id_2"]);
    }

    #[test]
    fn loads_csv_header() {
        let file = write_temp(".csv", "year,id_1,id_10,id_2\n");
        let schema = load_schema(file.path()).unwrap();
        assert_eq!(schema.columns(), ["year", "id_1", "id_10", "id_2"]);
    }

    #[test]
    fn padded_names_load_the_same_from_either_format() {
        let json = write_temp(".json", r#"[" year", "id_1 ", "id_2"]"#);
        let csv = write_temp(".csv", " year,id_1 ,id_2\n");
        let from_json = load_schema(json.path()).unwrap();
        let from_csv = load_schema(csv.path()).unwrap();
        assert_eq!(from_json.columns(), ["year", "id_1", "id_2"]);
        assert_eq!(from_json, from_csv);
    }

    #[test]
    fn padding_cannot_hide_a_duplicate() {
        let file = write_temp(".json", r#"["year", "id_1", " id_1"]"#);
        let err = load_schema(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("'id_1' more than once"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = write_temp(".pkl", "binary");
        let err = load_schema(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn rejects_non_string_entries() {
        let file = write_temp(".json", r#"["year", 3]"#);
        assert!(load_schema(file.path()).is_err());
    }

    #[test]
    fn rejects_empty_and_duplicate_columns() {
        assert!(TrainingSchema::new(Vec::new()).is_err());
        let dup = vec!["year".to_string(), "id_1".to_string(), "id_1".to_string()];
        assert!(TrainingSchema::new(dup).is_err());
    }
}
