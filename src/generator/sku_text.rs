//! Semicolon-delimited text listing of generated SKUs.

use crate::error::{CalcError, Result};
use crate::model::SkuItem;

/// Header line of the SKU listing.
pub const SKU_CSV_HEADER: &str = "CODIGO;DESCRIPCION;FAMILIA";

/// Render items as `code;description;family` lines under [`SKU_CSV_HEADER`].
///
/// Fields holding a `;` or a quote are quoted, so the listing reads back
/// with three columns per row.
pub fn sku_csv_text(items: &[SkuItem]) -> Result<String> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    out.write_record(SKU_CSV_HEADER.split(';'))?;
    for item in items {
        out.write_record([&item.code, &item.description, &item.family])?;
    }

    let bytes = out
        .into_inner()
        .map_err(|e| CalcError::Io(e.into_error()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}
