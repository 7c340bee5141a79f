//! Configuration constants and settings for the calculator.

use serde::{Deserialize, Serialize};

use crate::sku::SkuVersion;

/// Seam allowance added to each cushion side to get the plate size (cm).
pub const PLATE_MARGIN_CM: f64 = 5.0;

/// Standard fabric roll widths in cm, in ascending order.
pub const FABRIC_WIDTHS: [u32; 11] = [140, 160, 180, 200, 220, 240, 260, 280, 290, 300, 320];

/// Maximum length of a generated SKU code.
pub const SKU_MAX_LEN: usize = 10;

/// Tolerance used by the formula audit.
pub const AUDIT_TOLERANCE: f64 = 0.0001;

/// Status marker written to exports when a plate does not fit a roll.
pub const NOT_FITTING_MARKER: &str = "NO CABE";

/// Decimal places kept for consumption in metres on export.
pub const EXPORT_DECIMALS: i32 = 4;

/// Exit status of the binary when the formula audit fails.
pub const AUDIT_EXIT_STATUS: i32 = 70;

/// Parse a user-supplied measure in cm; a decimal comma is accepted.
pub fn parse_positive(field: &str, text: &str) -> crate::error::Result<f64> {
    let invalid = || crate::error::CalcError::InvalidValue {
        field: field.to_string(),
        expected: "a positive number".to_string(),
        value: text.to_string(),
    };
    let value: f64 = text.trim().replace(',', ".").parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Fabric kind, which decides whether plates may be rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FabricKind {
    /// Directional or printed fabric: rotation is forbidden.
    Patterned,
    /// Plain fabric: both orientations are evaluated.
    #[default]
    Plain,
}

impl FabricKind {
    /// Build from the `is_patterned` flag.
    pub fn from_patterned(is_patterned: bool) -> Self {
        if is_patterned {
            FabricKind::Patterned
        } else {
            FabricKind::Plain
        }
    }

    pub fn is_patterned(&self) -> bool {
        matches!(self, FabricKind::Patterned)
    }

    /// Whether the rotated orientation may be considered.
    pub fn allows_rotation(&self) -> bool {
        !self.is_patterned()
    }
}

impl std::fmt::Display for FabricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FabricKind::Patterned => write!(f, "patterned"),
            FabricKind::Plain => write!(f, "plain"),
        }
    }
}

/// Settings owned by the caller and passed to every batch operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcConfig {
    /// Orientation policy applied uniformly to all items.
    pub fabric: FabricKind,
    /// SKU algorithm version.
    pub sku_version: SkuVersion,
}

impl CalcConfig {
    /// Create a configuration for the given fabric kind.
    pub fn new(fabric: FabricKind) -> Self {
        Self {
            fabric,
            ..Default::default()
        }
    }

    /// Set the SKU version.
    pub fn with_sku_version(mut self, version: SkuVersion) -> Self {
        self.sku_version = version;
        self
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::AUDIT_TOLERANCE;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < AUDIT_TOLERANCE
    }

    /// Round to a fixed number of decimal places.
    #[inline]
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    }
}
