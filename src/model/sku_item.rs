//! Generated inventory code.

use serde::{Deserialize, Serialize};

use crate::config::SKU_MAX_LEN;

/// One generated or looked-up inventory code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuItem {
    /// Generated code, at most [`SKU_MAX_LEN`] characters.
    pub code: String,
    /// Description exactly as entered.
    pub description: String,
    /// Family code used as the code prefix.
    pub family: String,
}

impl SkuItem {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        family: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            family: family.into(),
        }
    }

    /// Check the code fits the length budget.
    pub fn is_length_valid(&self) -> bool {
        self.code.chars().count() <= SKU_MAX_LEN
    }
}
