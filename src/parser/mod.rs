//! Spreadsheet ingestion into ordered rows.

mod spreadsheet;

pub use spreadsheet::{parse_csv, parse_json_rows, read_rows, InputFormat};
