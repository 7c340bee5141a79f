//! Fabric consumption engine.

mod audit;
mod consumption;

pub use audit::{ensure_formula_audit, run_formula_audit, AuditReport};
pub use consumption::{
    calculate_all_widths, calculate_consumption, calculate_metrics, recompute_all,
};
