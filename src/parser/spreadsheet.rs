//! Readers for CSV, JSON and workbook files.
//!
//! Every reader yields rows as ordered column-name -> value maps. Empty
//! cells are left out of the row and fully empty rows are dropped.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde_json::{Number, Value};
use tracing::{debug, info};

use crate::error::{CalcError, Result};
use crate::model::SourceRow;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    Workbook,
}

impl InputFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(InputFormat::Workbook),
            _ => Err(CalcError::UnsupportedFormat { extension: ext }),
        }
    }
}

/// Read all data rows of a file. Workbooks use their first sheet.
pub fn read_rows(path: &Path) -> Result<Vec<SourceRow>> {
    if !path.exists() {
        return Err(CalcError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = InputFormat::from_path(path)?;
    let rows = match format {
        InputFormat::Csv => parse_csv(&std::fs::read_to_string(path)?)?,
        InputFormat::Json => parse_json_rows(&std::fs::read_to_string(path)?)?,
        InputFormat::Workbook => read_workbook(path)?,
    };

    if rows.is_empty() {
        return Err(CalcError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    info!("Read {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Convert a text cell into a number when it is entirely numeric.
fn typed_cell(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        return Some(Value::Number(n));
    }
    Some(Value::String(text.to_string()))
}

/// Pick the most frequent of `,` `;` and tab in the header line.
fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| {
            let count = header.bytes().filter(|b| b == d).count();
            // Prefer ',' on ties by ranking it highest.
            (count, *d == b',')
        })
        .unwrap_or(b',')
}

/// Parse CSV text with a header row.
pub fn parse_csv(content: &str) -> Result<Vec<SourceRow>> {
    let delimiter = detect_delimiter(content);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: SourceRow = record
            .iter()
            .zip(headers.iter())
            .filter(|(_, header)| !header.is_empty())
            .filter_map(|(value, header)| typed_cell(value).map(|v| (header.clone(), v)))
            .collect();

        if !row.is_empty() {
            rows.push(row);
        }
    }

    debug!(delimiter = %(delimiter as char), rows = rows.len(), "parsed csv");
    Ok(rows)
}

/// Parse a JSON array of objects.
pub fn parse_json_rows(content: &str) -> Result<Vec<SourceRow>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(CalcError::InvalidJsonShape {
            found: json_kind(&value).to_string(),
        });
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            other => Err(CalcError::InvalidJsonShape {
                found: format!("array containing {}", json_kind(&other)),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::Int(i) => Some(Value::Number((*i).into())),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        other => Some(Value::String(other.to_string())),
    }
}

fn read_workbook(path: &Path) -> Result<Vec<SourceRow>> {
    let spreadsheet_err = |e: calamine::Error| CalcError::Spreadsheet {
        message: e.to_string(),
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CalcError::Spreadsheet {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(spreadsheet_err)?;

    let mut cells = range.rows();
    let Some(header_row) = cells.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let rows: Vec<SourceRow> = cells
        .map(|data_row| {
            data_row
                .iter()
                .zip(headers.iter())
                .filter(|(_, header)| !header.is_empty())
                .filter_map(|(cell, header)| cell_value(cell).map(|v| (header.clone(), v)))
                .collect::<SourceRow>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    debug!(sheet = sheet_name.as_str(), rows = rows.len(), "parsed workbook");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("a.CSV")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("a.xlsx")).unwrap(), InputFormat::Workbook);
        assert_eq!(InputFormat::from_path(Path::new("a.json")).unwrap(), InputFormat::Json);
        assert!(matches!(
            InputFormat::from_path(Path::new("a.pdf")),
            Err(CalcError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_parse_csv_typed_values_and_order() {
        let rows = parse_csv("Ref,Ancho,Alto\nA1,40,50.5\nA2,45,\n,,\n").unwrap();
        assert_eq!(rows.len(), 2);
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, ["Ref", "Ancho", "Alto"]);
        assert_eq!(rows[0]["Ancho"], json!(40));
        assert_eq!(rows[0]["Alto"], json!(50.5));
        assert_eq!(rows[0]["Ref"], json!("A1"));
        assert!(!rows[1].contains_key("Alto"));
    }

    #[test]
    fn test_parse_csv_semicolon() {
        let rows = parse_csv("ancho;alto\n40;50\n").unwrap();
        assert_eq!(rows[0]["ancho"], json!(40));
        assert_eq!(rows[0]["alto"], json!(50));
    }

    #[test]
    fn test_parse_json_rows() {
        let rows = parse_json_rows(r#"[{"w": 40, "h": 50}, {"w": "45"}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["w"], json!("45"));

        assert!(matches!(
            parse_json_rows(r#"{"w": 40}"#),
            Err(CalcError::InvalidJsonShape { .. })
        ));
        assert!(matches!(
            parse_json_rows("[1, 2]"),
            Err(CalcError::InvalidJsonShape { .. })
        ));
    }

    #[test]
    fn test_read_rows_missing_file() {
        let err = read_rows(Path::new("/nonexistent/input.csv")).unwrap_err();
        assert!(matches!(err, CalcError::FileNotFound { .. }));
    }
}
