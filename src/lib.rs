//! cushion-calc - Fabric consumption for cushion covers and SKU generation.
//!
//! The library computes how much fabric a rectangular cushion cover uses on
//! each standard roll width, finds width/height columns in arbitrary
//! spreadsheet rows, and compresses product descriptions into short
//! inventory codes.
//!
//! # Example
//!
//! ```no_run
//! use cushion_calc::{ensure_formula_audit, process_file, CalcConfig, FabricKind};
//! use std::path::Path;
//!
//! ensure_formula_audit().unwrap();
//! let config = CalcConfig::new(FabricKind::Plain);
//! let (batch, report) = process_file(Path::new("cushions.xlsx"), &config).unwrap();
//! println!("{} items, passed: {}", batch.items.len(), report.passed);
//! ```

pub mod batch;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod sku;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use batch::{Batch, ItemQuery, SortDirection, SortKey};
pub use config::{CalcConfig, FabricKind, FABRIC_WIDTHS};
pub use detect::{detect_dimensions, DimensionDetector, Dimensions, KeywordTable};
pub use engine::{
    calculate_all_widths, calculate_consumption, ensure_formula_audit, run_formula_audit,
    AuditReport,
};
pub use error::{CalcError, Result};
pub use generator::{export_rows, sku_csv_text};
pub use model::{CalculationResult, CushionItem, Orientation, SkuItem, SourceRow};
pub use parser::read_rows;
pub use sku::{generate_sku, generate_sku_versioned, SkuVersion};
pub use validation::{validate_batch, ValidationResult};

/// Read a spreadsheet and compute every row.
///
/// This is the main high-level function that performs the full pipeline:
/// 1. Read the rows of the file
/// 2. Detect width and height on each row
/// 3. Compute results for every fabric width with the configured policy
/// 4. Validate the batch
pub fn process_file(
    input_path: &std::path::Path,
    config: &CalcConfig,
) -> Result<(Batch, ValidationResult)> {
    process_file_with(input_path, config, &DimensionDetector::default())
}

/// Same as [`process_file`] with a custom detector.
pub fn process_file_with(
    input_path: &std::path::Path,
    config: &CalcConfig,
    detector: &DimensionDetector,
) -> Result<(Batch, ValidationResult)> {
    let rows = read_rows(input_path)?;
    let batch = Batch::from_rows(rows, detector, config.fabric);

    let validation = validate_batch(&batch);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }

    Ok((batch, validation))
}
