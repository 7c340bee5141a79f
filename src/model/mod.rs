//! Data model types for the cushion calculator.

mod cushion;
mod result;
mod sku_item;

pub use cushion::{CushionItem, ResultsByWidth, SourceRow};
pub use result::{CalculationResult, Orientation};
pub use sku_item::SkuItem;
