//! Local batch history.

mod history;

pub use history::{load_history, load_records, save_batch, HistoryRecord};
