//! Export of computed batches and SKU lists.

mod export;
mod sku_text;

pub use export::{export_rows, width_columns, write_csv, write_json, ExportFormat};
pub use sku_text::{sku_csv_text, SKU_CSV_HEADER};
