//! Batch validation report.

mod validate;

pub use validate::{validate_batch, validate_item, ValidationResult};
