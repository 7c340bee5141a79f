//! Inventory code generation.

mod article;
mod compressor;

pub use article::{ArticleName, Finish, KNOWN_FAMILIES};
pub use compressor::{
    generate_sku, generate_sku_items, generate_sku_versioned, validate_family, SkuVersion,
};
