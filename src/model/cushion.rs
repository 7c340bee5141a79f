//! One cushion row of a batch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CalculationResult;
use crate::config::{FabricKind, FABRIC_WIDTHS};
use crate::engine::calculate_all_widths;

/// Source record as read from a spreadsheet, column order preserved.
pub type SourceRow = serde_json::Map<String, serde_json::Value>;

/// Results keyed by standard fabric width (cm).
pub type ResultsByWidth = BTreeMap<u32, CalculationResult>;

/// A cushion with its dimensions and per-width results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CushionItem {
    /// Identifier, unique within a batch.
    pub id: String,
    /// Original record, kept for export.
    pub original_row: SourceRow,
    /// Cushion width (cm).
    pub width: f64,
    /// Cushion height (cm).
    pub height: f64,
    /// Results for every entry of [`FABRIC_WIDTHS`].
    pub results: ResultsByWidth,
}

impl CushionItem {
    /// Create an item and compute its results for every fabric width.
    pub fn new(
        id: impl Into<String>,
        original_row: SourceRow,
        width: f64,
        height: f64,
        fabric: FabricKind,
    ) -> Self {
        Self {
            id: id.into(),
            original_row,
            width,
            height,
            results: calculate_all_widths(width, height, fabric),
        }
    }

    /// Recompute all results from width and height.
    pub fn recompute(&mut self, fabric: FabricKind) {
        self.results = calculate_all_widths(self.width, self.height, fabric);
    }

    /// Result for one standard fabric width.
    pub fn result_for(&self, fabric_width: u32) -> Option<&CalculationResult> {
        self.results.get(&fabric_width)
    }

    /// Fabric widths in which the cushion fits.
    pub fn fitting_widths(&self) -> Vec<u32> {
        FABRIC_WIDTHS
            .iter()
            .copied()
            .filter(|fw| self.result_for(*fw).is_some_and(|r| r.is_valid))
            .collect()
    }

    /// Cushion area (cm²).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}
