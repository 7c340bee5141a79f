//! Batch pipeline: rows in, computed items out, plus result queries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FabricKind;
use crate::detect::DimensionDetector;
use crate::engine::recompute_all;
use crate::model::{CushionItem, SourceRow};

/// Items built from a set of rows, and the rows that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub items: Vec<CushionItem>,
    /// Source indices of rows without detectable dimensions.
    pub skipped_rows: Vec<usize>,
}

impl Batch {
    /// Detect dimensions on every row and compute results.
    ///
    /// Items are named `row-<index>` after their position in `rows`.
    pub fn from_rows(rows: Vec<SourceRow>, detector: &DimensionDetector, fabric: FabricKind) -> Self {
        let mut batch = Batch::default();

        for (index, row) in rows.into_iter().enumerate() {
            match detector.detect(&row) {
                Some(dims) => batch.items.push(CushionItem::new(
                    format!("row-{index}"),
                    row,
                    dims.width,
                    dims.height,
                    fabric,
                )),
                None => {
                    debug!(row = index + 1, "no width/height columns detected");
                    batch.skipped_rows.push(index);
                }
            }
        }

        info!(
            "Batch ready: {} item(s), {} skipped, {} fabric",
            batch.items.len(),
            batch.skipped_rows.len(),
            fabric
        );
        batch
    }

    /// Recompute every item for a new orientation policy.
    pub fn apply_policy(&mut self, fabric: FabricKind) {
        recompute_all(&mut self.items, fabric);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sort key for result listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Cushion area.
    Dimensions,
    /// Consumption in metres at a fabric width; rows that do not fit go last.
    Consumption(u32),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Filter and sort options for a list of items.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    /// Free text: a `WxH` size, or text found in the sizes, id or row.
    pub search: Option<String>,
    /// Exact width.
    pub width: Option<f64>,
    /// Exact height.
    pub height: Option<f64>,
    pub sort: Option<(SortKey, SortDirection)>,
}

fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    let valid = !text.is_empty()
        && text.chars().filter(|c| matches!(c, '.' | ',')).count() <= 1
        && text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        && text.starts_with(|c: char| c.is_ascii_digit())
        && text.ends_with(|c: char| c.is_ascii_digit());
    if !valid {
        return None;
    }
    text.replace(',', ".").parse().ok()
}

/// Parse a `WxH` search term such as `40x50`, `40 X 50` or `40,5*50`.
fn parse_size_term(term: &str) -> Option<(f64, f64)> {
    let (w, h) = term.split_once(['x', 'X', '*'])?;
    Some((parse_decimal(w)?, parse_decimal(h)?))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        }),
        other => Some(other.to_string()),
    }
}

fn matches_search(item: &CushionItem, search: &str) -> bool {
    let term = search.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    if let Some((w, h)) = parse_size_term(&term) {
        return item.width == w && item.height == h;
    }

    if item.width.to_string().contains(&term)
        || item.height.to_string().contains(&term)
        || item.id.to_lowercase().contains(&term)
    {
        return true;
    }

    let row_text = item
        .original_row
        .values()
        .filter_map(value_text)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    row_text.contains(&term)
}

/// Sort value of an item; `None` when it does not fit the sorted width.
fn sort_value(item: &CushionItem, key: SortKey) -> Option<f64> {
    match key {
        SortKey::Dimensions => Some(item.area()),
        SortKey::Consumption(fw) => item
            .result_for(fw)
            .filter(|r| r.is_valid)
            .map(|r| r.consumption_m),
    }
}

impl ItemQuery {
    /// Whether an item passes the filters.
    pub fn matches(&self, item: &CushionItem) -> bool {
        if self.width.is_some_and(|w| item.width != w) {
            return false;
        }
        if self.height.is_some_and(|h| item.height != h) {
            return false;
        }
        self.search
            .as_deref()
            .map_or(true, |search| matches_search(item, search))
    }

    /// Filter then sort. The sort is stable, so equal rows keep batch order.
    pub fn apply<'a>(&self, items: &'a [CushionItem]) -> Vec<&'a CushionItem> {
        let mut selected: Vec<&CushionItem> = items.iter().filter(|i| self.matches(i)).collect();

        if let Some((key, direction)) = self.sort {
            // Rows that do not fit go last in both directions.
            selected.sort_by(|a, b| match (sort_value(a, key), sort_value(b, key)) {
                (Some(x), Some(y)) => {
                    let ordering = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                    match direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }

        debug!(total = items.len(), selected = selected.len(), "query applied");
        selected
    }
}
