//! History file of saved batches.
//!
//! A record keeps only the cushion width, height and original row. Results
//! are never stored: loading always recomputes them, and any result fields
//! found in the file are ignored.
//!
//! Saves write to a `.tmp` file and rename it over the history file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FabricKind;
use crate::error::{CalcError, Result};
use crate::model::{CushionItem, SourceRow};

/// Source tag written into rows rebuilt from a record without an original row.
const FALLBACK_SOURCE: &str = "History";

/// One saved cushion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: u64,
    pub batch_name: String,
    pub created_at: DateTime<Utc>,
    pub cushion_width: f64,
    pub cushion_height: f64,
    #[serde(default)]
    pub original_row: Option<SourceRow>,
}

impl HistoryRecord {
    /// Rebuild the item, recomputing results with the current policy.
    pub fn to_item(&self, index: usize, fabric: FabricKind) -> CushionItem {
        let row = self.original_row.clone().unwrap_or_else(|| {
            let mut row = SourceRow::new();
            row.insert("ancho".to_string(), Value::from(self.cushion_width));
            row.insert("alto".to_string(), Value::from(self.cushion_height));
            row.insert("_source".to_string(), Value::from(FALLBACK_SOURCE));
            row
        });
        CushionItem::new(
            format!("db-{}-{}", self.id, index),
            row,
            self.cushion_width,
            self.cushion_height,
            fabric,
        )
    }
}

/// Read all records, oldest first. A missing file is an empty history.
pub fn load_records(path: &Path) -> Result<Vec<HistoryRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

/// Sibling temp file: `history.json` is staged as `history.json.tmp`.
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_records(path: &Path, records: &[HistoryRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(json.as_bytes())?;
    tmp_file.sync_all()?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::Io(e)
    })?;
    Ok(())
}

/// Append a batch to the history file and return the new records.
pub fn save_batch(path: &Path, items: &[CushionItem], batch_name: &str) -> Result<Vec<HistoryRecord>> {
    let mut records = load_records(path)?;
    let mut next_id = records.iter().map(|r| r.id).max().map_or(1, |id| id + 1);
    let created_at = Utc::now();

    let new_records: Vec<HistoryRecord> = items
        .iter()
        .map(|item| {
            let record = HistoryRecord {
                id: next_id,
                batch_name: batch_name.to_string(),
                created_at,
                cushion_width: item.width,
                cushion_height: item.height,
                original_row: Some(item.original_row.clone()),
            };
            next_id += 1;
            record
        })
        .collect();

    records.extend(new_records.iter().cloned());
    write_records(path, &records)?;

    info!(
        "Saved {} item(s) as '{}' to {}",
        new_records.len(),
        batch_name,
        path.display()
    );
    Ok(new_records)
}

/// Load every saved cushion, newest first, with freshly computed results.
pub fn load_history(path: &Path, fabric: FabricKind) -> Result<Vec<CushionItem>> {
    let mut records = load_records(path)?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let items: Vec<CushionItem> = records
        .iter()
        .enumerate()
        .map(|(index, record)| record.to_item(index, fabric))
        .collect();

    debug!(count = items.len(), %fabric, "history loaded and recomputed");
    Ok(items)
}
