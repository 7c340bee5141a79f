//! Startup formula audit.
//!
//! Two reference cushions are computed on a 280 cm roll with patterned
//! fabric and checked against fixed expected values. Any mismatch means the
//! formulas or constants drifted and the application must not start.

use tracing::{error, info};

use super::calculate_consumption;
use crate::config::{float_cmp, FabricKind};
use crate::error::{CalcError, Result};
use crate::model::CalculationResult;

struct ReferenceCase {
    width: f64,
    height: f64,
    fabric_width: f64,
    plates_per_row: u32,
    cushions_per_strip: f64,
    consumption_m: f64,
}

const REFERENCE_CASES: [ReferenceCase; 2] = [
    ReferenceCase {
        width: 40.0,
        height: 50.0,
        fabric_width: 280.0,
        plates_per_row: 6,
        cushions_per_strip: 3.0,
        consumption_m: 0.183333,
    },
    ReferenceCase {
        width: 40.0,
        height: 40.0,
        fabric_width: 280.0,
        plates_per_row: 6,
        cushions_per_strip: 3.0,
        consumption_m: 0.15,
    },
];

impl ReferenceCase {
    fn evaluate(&self) -> (CalculationResult, bool) {
        let result = calculate_consumption(
            self.width,
            self.height,
            self.fabric_width,
            FabricKind::Patterned,
        );
        let passed = result.plates_per_row == self.plates_per_row
            && result.cushions_per_strip == self.cushions_per_strip
            && float_cmp::approx_eq(result.consumption_m, self.consumption_m);
        (result, passed)
    }
}

/// Outcome of the formula audit.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Whether both reference cases matched.
    pub passed: bool,
    /// Result for the 40x50 reference cushion.
    pub first: CalculationResult,
    /// Result for the 40x40 reference cushion.
    pub second: CalculationResult,
}

impl AuditReport {
    /// Convert a failed report into a fatal error.
    pub fn into_result(self) -> Result<()> {
        if self.passed {
            Ok(())
        } else {
            Err(CalcError::FormulaAudit {
                first: Box::new(self.first),
                second: Box::new(self.second),
            })
        }
    }
}

/// Run the audit and report the outcome without failing.
pub fn run_formula_audit() -> AuditReport {
    let [first_case, second_case] = &REFERENCE_CASES;
    let (first, first_ok) = first_case.evaluate();
    let (second, second_ok) = second_case.evaluate();

    AuditReport {
        passed: first_ok && second_ok,
        first,
        second,
    }
}

/// Run the audit and fail with [`CalcError::FormulaAudit`] on mismatch.
///
/// Callers must check this before doing any other work.
pub fn ensure_formula_audit() -> Result<()> {
    let report = run_formula_audit();
    if report.passed {
        info!("Formula audit passed");
    } else {
        error!(
            first = ?report.first,
            second = ?report.second,
            "Formula audit failed: results do not match the reference cases"
        );
    }
    report.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_passes() {
        let report = run_formula_audit();
        assert!(report.passed);
        assert_eq!(report.first.plates_per_row, 6);
        assert_eq!(report.second.consumption_m, 0.15);
        assert!(ensure_formula_audit().is_ok());
    }

    #[test]
    fn test_failed_report_is_fatal() {
        let report = AuditReport {
            passed: false,
            first: CalculationResult::invalid(280.0),
            second: CalculationResult::invalid(280.0),
        };
        let err = report.into_result().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.code_value(), 900);
    }
}
