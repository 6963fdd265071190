//! Wide-table input for EPM measurements
//!
//! The input is a comma-separated export of the measurement sheet: one row
//! per parameter, first column the parameter name, every further column one
//! (subject, condition) cell. Only this shape is supported.

use crate::error::{AnalysisError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Cell spellings treated as missing values
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// One parameter row of the wide table
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    /// Parameter name (first column)
    pub parameter: String,

    /// One value per data column; `None` for missing or non-numeric cells
    pub values: Vec<Option<f64>>,
}

/// Wide measurement table: parameters × (subject, condition) columns
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    /// Header of the parameter column
    pub parameter_header: String,

    /// Headers of the data columns, in file order
    pub columns: Vec<String>,

    /// Parameter rows, in file order
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// Build a table from already-parsed parts
    pub fn new(parameter_header: impl Into<String>, columns: Vec<String>, rows: Vec<WideRow>) -> Self {
        Self {
            parameter_header: parameter_header.into(),
            columns,
            rows,
        }
    }

    /// Load and parse a wide table from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            anyhow::bail!("Input table not found: {}", path.display());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let table = Self::from_csv_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            rows = table.rows.len(),
            columns = table.columns.len(),
            "loaded wide table"
        );

        Ok(table)
    }

    /// Parse a wide table from CSV text
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Err(AnalysisError::MalformedTable("empty input".to_string()));
        };

        let mut header = split_record(header_line)
            .map_err(|e| AnalysisError::MalformedTable(format!("header: {}", e)))?
            .into_iter();

        let parameter_header = header.next().unwrap_or_default();
        let columns: Vec<String> = header.collect();

        if columns.is_empty() {
            return Err(AnalysisError::MalformedTable(
                "header has no data columns after the parameter column".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (index, line) in lines {
            let line_no = index + 1;
            let fields = split_record(line)
                .map_err(|e| AnalysisError::MalformedTable(format!("line {}: {}", line_no, e)))?;

            let mut fields = fields.into_iter();
            let parameter = fields.next().unwrap_or_default().trim().to_string();
            if parameter.is_empty() {
                tracing::debug!(line = line_no, "skipping row without parameter name");
                continue;
            }

            let cells: Vec<String> = fields.collect();
            if cells.len() > columns.len() {
                tracing::warn!(
                    line = line_no,
                    extra = cells.len() - columns.len(),
                    "row has more cells than the header; extra cells ignored"
                );
            }

            let values = (0..columns.len())
                .map(|col| {
                    cells
                        .get(col)
                        .and_then(|raw| parse_cell(raw, &parameter, &columns[col]))
                })
                .collect();

            rows.push(WideRow { parameter, values });
        }

        Ok(Self {
            parameter_header,
            columns,
            rows,
        })
    }
}

/// Parse one cell; missing markers and unparsable text become `None`
fn parse_cell(raw: &str, parameter: &str, column: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) => None,
        Err(_) => {
            tracing::warn!(parameter, column, cell = trimmed, "non-numeric cell treated as missing");
            None
        }
    }
}

/// Split one CSV record, honouring double-quoted fields and `""` escapes
fn split_record(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }

    fields.push(field);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_record() {
        assert_eq!(split_record("a,b,c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_quoted_fields() {
        assert_eq!(
            split_record(r#""MeanSpeed, cm/s",1.5,"say ""hi""""#).unwrap(),
            vec!["MeanSpeed, cm/s", "1.5", r#"say "hi""#]
        );
    }

    #[test]
    fn test_split_trailing_empty_field() {
        assert_eq!(split_record("a,,").unwrap(), vec!["a", "", ""]);
    }

    #[test]
    fn test_split_unterminated_quote_is_error() {
        assert!(split_record(r#"a,"b"#).is_err());
    }

    #[test]
    fn test_parse_basic_table() {
        let csv = "Parameter,PD1_NoStim,PD1_Stim\nTime_OpenArms,12.5,20\n";
        let table = WideTable::from_csv_str(csv).unwrap();

        assert_eq!(table.parameter_header, "Parameter");
        assert_eq!(table.columns, vec!["PD1_NoStim", "PD1_Stim"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].parameter, "Time_OpenArms");
        assert_eq!(table.rows[0].values, vec![Some(12.5), Some(20.0)]);
    }

    #[test]
    fn test_missing_markers_and_short_rows() {
        let csv = "Parameter,A,B,C,D\nX,NA,,nan\n";
        let table = WideTable::from_csv_str(csv).unwrap();
        assert_eq!(table.rows[0].values, vec![None, None, None, None]);
    }

    #[test]
    fn test_non_numeric_cell_is_missing() {
        let csv = "Parameter,A,B\nX,abc,2\n";
        let table = WideTable::from_csv_str(csv).unwrap();
        assert_eq!(table.rows[0].values, vec![None, Some(2.0)]);
    }

    #[test]
    fn test_bom_and_blank_lines_are_ignored() {
        let csv = "\u{feff}Parameter,A\n\nX,1\n\n";
        let table = WideTable::from_csv_str(csv).unwrap();
        assert_eq!(table.parameter_header, "Parameter");
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_rows_without_parameter_are_skipped() {
        let csv = "Parameter,A\n,1\nX,2\n";
        let table = WideTable::from_csv_str(csv).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].parameter, "X");
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(
            WideTable::from_csv_str(""),
            Err(AnalysisError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_header_without_data_columns_is_error() {
        assert!(matches!(
            WideTable::from_csv_str("Parameter\nX\n"),
            Err(AnalysisError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_from_file_missing_path() {
        assert!(WideTable::from_file("/nonexistent/plusmaze/input.csv").is_err());
    }

    #[test]
    fn test_from_file_roundtrip() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Parameter,PD1_NoStim").unwrap();
        writeln!(file, "Entries_OpenArms,4").unwrap();

        let table = WideTable::from_file(file.path()).unwrap();
        assert_eq!(table.rows[0].values, vec![Some(4.0)]);
    }
}
