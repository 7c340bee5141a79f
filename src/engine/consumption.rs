//! Plate layout and consumption per cushion.
//!
//! The pipeline is fixed:
//! 1. plate = cushion side + [`PLATE_MARGIN_CM`] on both axes
//! 2. plates per row = floor(fabric width / plate width), the only truncation
//! 3. cushions per strip = plates per row / 2, kept fractional
//! 4. strip height = plate height
//! 5. consumption = strip height / cushions per strip (cm), then / 100 (m)

use tracing::debug;

use crate::config::{FabricKind, FABRIC_WIDTHS, PLATE_MARGIN_CM};
use crate::model::{CalculationResult, CushionItem, Orientation, ResultsByWidth};

/// Compute layout metrics for a plate laid with `horizontal` across the roll.
///
/// The returned result carries the default orientation tag; callers set it.
pub fn calculate_metrics(horizontal: f64, vertical: f64, fabric_width: f64) -> CalculationResult {
    let plate_width = horizontal + PLATE_MARGIN_CM;
    let plate_height = vertical + PLATE_MARGIN_CM;

    let plates = (fabric_width / plate_width).floor();
    if plates.is_nan() || plates < 1.0 {
        return CalculationResult::invalid(fabric_width);
    }
    let plates_per_row = plates as u32;

    let cushions_per_strip = plates / 2.0;
    let strip_height_cm = plate_height;
    let consumption_cm = strip_height_cm / cushions_per_strip;
    let consumption_m = consumption_cm / 100.0;

    CalculationResult {
        fabric_width,
        plate_width,
        plate_height,
        plates_per_row,
        cushions_per_strip,
        strip_height_cm,
        consumption_cm,
        consumption_m,
        is_valid: true,
        ..Default::default()
    }
}

/// Compute the consumption of one cushion on one fabric width.
///
/// Patterned fabric is evaluated as given. Plain fabric is also evaluated
/// rotated and the rotated layout wins only if it is the only valid one or
/// strictly cheaper.
pub fn calculate_consumption(
    cushion_width: f64,
    cushion_height: f64,
    fabric_width: f64,
    fabric: FabricKind,
) -> CalculationResult {
    let normal = calculate_metrics(cushion_width, cushion_height, fabric_width)
        .with_orientation(Orientation::Normal);

    if !fabric.allows_rotation() {
        return normal;
    }

    let rotated = calculate_metrics(cushion_height, cushion_width, fabric_width)
        .with_orientation(Orientation::Rotated);

    let chosen = match (normal.is_valid, rotated.is_valid) {
        (false, true) => rotated,
        (true, true) if rotated.consumption_m < normal.consumption_m => rotated,
        _ => normal,
    };

    debug!(
        cushion_width,
        cushion_height,
        fabric_width,
        orientation = %chosen.orientation,
        valid = chosen.is_valid,
        "orientation selected"
    );

    chosen
}

/// Compute results for every standard fabric width.
pub fn calculate_all_widths(width: f64, height: f64, fabric: FabricKind) -> ResultsByWidth {
    FABRIC_WIDTHS
        .iter()
        .map(|&fw| (fw, calculate_consumption(width, height, f64::from(fw), fabric)))
        .collect()
}

/// Recompute every item after a policy change or a batch load.
pub fn recompute_all(items: &mut [CushionItem], fabric: FabricKind) {
    for item in items.iter_mut() {
        item.recompute(fabric);
    }
    debug!(count = items.len(), %fabric, "recomputed batch");
}
