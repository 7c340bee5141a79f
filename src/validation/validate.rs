//! Validation of computed batches.
//!
//! Nothing here stops a batch from being exported: rows without dimensions
//! and cushions that fit no roll are reported as warnings. Only a batch with
//! no usable rows at all fails.

use crate::batch::Batch;
use crate::config::FABRIC_WIDTHS;
use crate::model::CushionItem;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Create a failing result with an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate one item's dimensions and fit.
pub fn validate_item(item: &CushionItem) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if !(item.width > 0.0 && item.height > 0.0) {
        result.add_error(format!(
            "Item {}: Invalid dimensions ({}x{})",
            item.id, item.width, item.height
        ));
        return result;
    }

    let fitting = item.fitting_widths();
    if fitting.is_empty() {
        result.add_warning(format!(
            "Item {}: {}x{} does not fit any fabric width",
            item.id, item.width, item.height
        ));
    } else if fitting.len() < FABRIC_WIDTHS.len() {
        result.add_warning(format!(
            "Item {}: {}x{} only fits from {} cm",
            item.id, item.width, item.height, fitting[0]
        ));
    }

    result
}

/// Validate a batch.
pub fn validate_batch(batch: &Batch) -> ValidationResult {
    if batch.is_empty() {
        return ValidationResult::error(
            "No valid width/height columns found (use e.g. 'Ancho' and 'Alto')",
        );
    }

    let mut result = ValidationResult::ok();

    for index in &batch.skipped_rows {
        result.add_warning(format!(
            "Row {}: No width/height columns detected, row skipped",
            index + 1
        ));
    }

    for item in &batch.items {
        result.merge(validate_item(item));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FabricKind;
    use crate::model::SourceRow;

    fn item(width: f64, height: f64) -> CushionItem {
        CushionItem::new("row-0", SourceRow::new(), width, height, FabricKind::Patterned)
    }

    // ==================== ValidationResult tests ====================

    #[test]
    fn test_validation_result_ok() {
        let result = ValidationResult::ok();
        assert!(result.passed);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validation_result_merge() {
        let mut result1 = ValidationResult::ok();
        result1.add_warning("Warning 1");

        let mut result2 = ValidationResult::ok();
        result2.add_error("Error 1");
        result2.add_warning("Warning 2");

        result1.merge(result2);
        assert!(!result1.passed);
        assert_eq!(result1.warnings.len(), 2);
        assert_eq!(result1.errors.len(), 1);
    }

    // ==================== Item tests ====================

    #[test]
    fn test_item_fitting_everywhere() {
        let result = validate_item(&item(40.0, 40.0));
        assert!(result.passed);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_item_fitting_partially() {
        let result = validate_item(&item(150.0, 40.0));
        assert!(result.passed);
        assert_eq!(result.warnings, vec!["Item row-0: 150x40 only fits from 160 cm"]);
    }

    #[test]
    fn test_item_fitting_nowhere() {
        let result = validate_item(&item(400.0, 40.0));
        assert!(result.passed);
        assert!(result.warnings[0].contains("does not fit any fabric width"));
    }

    #[test]
    fn test_item_invalid_dimensions() {
        let result = validate_item(&item(0.0, 40.0));
        assert!(!result.passed);
    }

    // ==================== Batch tests ====================

    #[test]
    fn test_empty_batch_fails() {
        let result = validate_batch(&Batch::default());
        assert!(!result.passed);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_skipped_rows_are_warnings() {
        let batch = Batch {
            items: vec![item(40.0, 40.0)],
            skipped_rows: vec![0, 3],
        };
        let result = validate_batch(&batch);
        assert!(result.passed);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[1].starts_with("Row 4:"));
    }
}
