//! Width/height column detection for spreadsheet rows.

mod dimensions;
mod keywords;

pub use dimensions::{detect_dimensions, parse_numeric, DimensionDetector, Dimensions};
pub use keywords::{normalize_name, KeywordTable};
