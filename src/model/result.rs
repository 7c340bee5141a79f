//! Result of evaluating one cushion against one fabric roll width.

use serde::{Deserialize, Serialize};

/// Which way the plate was laid on the roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Cushion width runs across the roll.
    #[default]
    Normal,
    /// Cushion height runs across the roll.
    Rotated,
}

impl Orientation {
    /// Short human-readable note attached to results.
    pub fn note(&self) -> &'static str {
        match self {
            Orientation::Normal => "Normal",
            Orientation::Rotated => "Girado",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Normal => write!(f, "normal"),
            Orientation::Rotated => write!(f, "rotated"),
        }
    }
}

/// Layout metrics and consumption for one (cushion, fabric width, orientation).
///
/// When `is_valid` is false every numeric field except `fabric_width` is zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Fabric roll width (cm).
    pub fabric_width: f64,
    /// Plate width: horizontal cushion side plus margin (cm).
    pub plate_width: f64,
    /// Plate height: vertical cushion side plus margin (cm).
    pub plate_height: f64,
    /// Plates cut side by side across the roll.
    pub plates_per_row: u32,
    /// Theoretical cushions per strip, never floored.
    pub cushions_per_strip: f64,
    /// Strip height (cm), equal to the plate height.
    pub strip_height_cm: f64,
    /// Fabric length per cushion (cm).
    pub consumption_cm: f64,
    /// Fabric length per cushion (m).
    pub consumption_m: f64,
    /// False when not even one plate fits across the roll.
    pub is_valid: bool,
    pub orientation: Orientation,
    pub note: String,
}

impl CalculationResult {
    /// Result for a plate that does not fit the roll.
    pub fn invalid(fabric_width: f64) -> Self {
        Self {
            fabric_width,
            ..Default::default()
        }
    }

    /// Tag the result with the orientation it was computed for.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self.note = orientation.note().to_string();
        self
    }

    /// Whether the plate was rotated to obtain this result.
    pub fn is_rotated(&self) -> bool {
        self.orientation == Orientation::Rotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_result_is_zeroed() {
        let result = CalculationResult::invalid(140.0);
        assert!(!result.is_valid);
        assert_eq!(result.fabric_width, 140.0);
        assert_eq!(result.plate_width, 0.0);
        assert_eq!(result.plate_height, 0.0);
        assert_eq!(result.plates_per_row, 0);
        assert_eq!(result.cushions_per_strip, 0.0);
        assert_eq!(result.strip_height_cm, 0.0);
        assert_eq!(result.consumption_cm, 0.0);
        assert_eq!(result.consumption_m, 0.0);
    }

    #[test]
    fn test_with_orientation_sets_note() {
        let result = CalculationResult::invalid(140.0).with_orientation(Orientation::Rotated);
        assert!(result.is_rotated());
        assert_eq!(result.note, "Girado");
    }

    #[test]
    fn test_orientation_serializes_lowercase() {
        let json = serde_json::to_string(&Orientation::Rotated).unwrap();
        assert_eq!(json, "\"rotated\"");
    }
}
