//! Row-oriented export of a computed batch.
//!
//! Each exported row is the original source row followed, for every
//! standard fabric width, by either
//! `Tela_<fw>cm_Placas`, `Tela_<fw>cm_CojinesTeo`, `Tela_<fw>cm_Consumo_M`
//! or a single `Tela_<fw>cm_Estado` column holding [`NOT_FITTING_MARKER`].

use std::io::Write;
use std::path::Path;

use serde_json::{Number, Value};

use crate::config::{float_cmp, EXPORT_DECIMALS, FABRIC_WIDTHS, NOT_FITTING_MARKER};
use crate::error::{CalcError, Result};
use crate::model::{CushionItem, SourceRow};

/// Output formats for exported batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(CalcError::UnsupportedFormat { extension: ext }),
        }
    }
}

/// Column names written for one fabric width: plates, cushions, metres, status.
pub fn width_columns(fabric_width: u32) -> [String; 4] {
    let prefix = format!("Tela_{fabric_width}cm");
    [
        format!("{prefix}_Placas"),
        format!("{prefix}_CojinesTeo"),
        format!("{prefix}_Consumo_M"),
        format!("{prefix}_Estado"),
    ]
}

fn number(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Build the export rows for a batch.
pub fn export_rows<'a>(items: impl IntoIterator<Item = &'a CushionItem>) -> Vec<SourceRow> {
    items
        .into_iter()
        .map(|item| {
            let mut row = item.original_row.clone();
            for fw in FABRIC_WIDTHS {
                let [plates, cushions, metres, status] = width_columns(fw);
                match item.result_for(fw).filter(|r| r.is_valid) {
                    Some(result) => {
                        row.insert(plates, Value::from(result.plates_per_row));
                        row.insert(cushions, number(result.cushions_per_strip));
                        row.insert(
                            metres,
                            number(float_cmp::round_to(result.consumption_m, EXPORT_DECIMALS)),
                        );
                    }
                    None => {
                        row.insert(status, Value::from(NOT_FITTING_MARKER));
                    }
                }
            }
            row
        })
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write rows as CSV. The header is the union of all columns in first-seen order.
pub fn write_csv<W: Write>(rows: &[SourceRow], writer: W) -> Result<()> {
    let mut headers: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&headers)?;
    for row in rows {
        out.write_record(
            headers
                .iter()
                .map(|h| row.get(*h).map(cell_text).unwrap_or_default()),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array.
pub fn write_json<W: Write>(rows: &[SourceRow], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}
