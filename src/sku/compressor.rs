//! Deterministic SKU compression.
//!
//! A code is `family + components`, where the components are extracted from
//! the description:
//! - root: first significant word without vowels, capped
//! - numbers: every digit run, concatenated in order
//! - attributes: initial of each later word that is not purely numeric
//!
//! When the code is longer than [`SKU_MAX_LEN`] the components are shortened
//! one at a time in the version's truncation order. The family prefix is
//! never shortened by those stages.

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::config::SKU_MAX_LEN;
use crate::error::{CalcError, Result};
use crate::model::SkuItem;

/// Connector words dropped before extraction.
const IGNORED_WORDS: &[&str] = &[
    "DE", "CON", "PARA", "EL", "LA", "LOS", "LAS", "Y", "EN", "DEL", "POR",
];

/// Suffix used when the description has no significant words.
const GENERIC_SUFFIX: &str = "GEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Root,
    Attributes,
    Numbers,
}

/// SKU algorithm version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkuVersion {
    /// 4-char root, attributes before numbers.
    #[serde(rename = "v2")]
    V2,
    /// 3-char root, attributes after numbers.
    #[serde(rename = "v3")]
    V3,
    /// 3-char root, at most 3 digits, no attributes.
    #[default]
    #[serde(rename = "v3.1")]
    V3_1,
}

impl SkuVersion {
    /// Parse a version label such as `v3.1`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().trim_start_matches('v') {
            "2" => Some(SkuVersion::V2),
            "3" => Some(SkuVersion::V3),
            "3.1" => Some(SkuVersion::V3_1),
            _ => None,
        }
    }

    fn root_len(&self) -> usize {
        match self {
            SkuVersion::V2 => 4,
            SkuVersion::V3 | SkuVersion::V3_1 => 3,
        }
    }

    fn numbers_len(&self) -> Option<usize> {
        match self {
            SkuVersion::V3_1 => Some(3),
            SkuVersion::V2 | SkuVersion::V3 => None,
        }
    }

    fn assembly(&self) -> &'static [Component] {
        match self {
            SkuVersion::V2 => &[Component::Root, Component::Attributes, Component::Numbers],
            SkuVersion::V3 => &[Component::Root, Component::Numbers, Component::Attributes],
            SkuVersion::V3_1 => &[Component::Root, Component::Numbers],
        }
    }

    fn truncation_order(&self) -> &'static [Component] {
        match self {
            SkuVersion::V2 | SkuVersion::V3 => {
                &[Component::Attributes, Component::Numbers, Component::Root]
            }
            SkuVersion::V3_1 => &[Component::Numbers, Component::Root],
        }
    }
}

impl std::fmt::Display for SkuVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkuVersion::V2 => write!(f, "v2"),
            SkuVersion::V3 => write!(f, "v3"),
            SkuVersion::V3_1 => write!(f, "v3.1"),
        }
    }
}

#[derive(Debug, Default)]
struct Components {
    root: String,
    attributes: String,
    numbers: String,
}

impl Components {
    fn get_mut(&mut self, component: Component) -> &mut String {
        match component {
            Component::Root => &mut self.root,
            Component::Attributes => &mut self.attributes,
            Component::Numbers => &mut self.numbers,
        }
    }

    fn get(&self, component: Component) -> &str {
        match component {
            Component::Root => &self.root,
            Component::Attributes => &self.attributes,
            Component::Numbers => &self.numbers,
        }
    }

    fn assemble(&self, family: &str, order: &[Component]) -> String {
        let mut code = family.to_string();
        for component in order {
            code.push_str(self.get(*component));
        }
        code
    }
}

/// Uppercase, strip diacritics and keep only `[A-Z0-9 ]`.
fn clean_description(description: &str) -> String {
    description
        .to_uppercase()
        .nfd()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

fn extract_root(word: &str, max_len: usize) -> String {
    let consonants: String = word
        .chars()
        .filter(|c| !matches!(c, 'A' | 'E' | 'I' | 'O' | 'U'))
        .collect();
    let base = if consonants.is_empty() {
        word
    } else {
        consonants.as_str()
    };
    base.chars().take(max_len).collect()
}

fn extract_numbers(clean: &str, max_len: Option<usize>) -> String {
    let digits = clean.chars().filter(|c| c.is_ascii_digit());
    match max_len {
        Some(len) => digits.take(len).collect(),
        None => digits.collect(),
    }
}

fn extract_attributes(words: &[&str]) -> String {
    words
        .iter()
        .skip(1)
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|w| w.chars().next())
        .collect()
}

fn clamp(code: &str) -> String {
    code.chars().take(SKU_MAX_LEN).collect()
}

/// Generate a SKU with a specific algorithm version.
pub fn generate_sku_versioned(description: &str, family: &str, version: SkuVersion) -> String {
    let clean = clean_description(description);
    let words: Vec<&str> = clean
        .split(' ')
        .filter(|w| !w.is_empty() && !IGNORED_WORDS.contains(w))
        .collect();

    let Some(first) = words.first() else {
        return clamp(&format!("{family}{GENERIC_SUFFIX}"));
    };

    let assembly = version.assembly();
    let mut components = Components {
        root: extract_root(first, version.root_len()),
        numbers: extract_numbers(&clean, version.numbers_len()),
        ..Default::default()
    };
    if assembly.contains(&Component::Attributes) {
        components.attributes = extract_attributes(&words);
    }

    let mut code = components.assemble(family, assembly);
    for component in version.truncation_order() {
        let len = code.chars().count();
        if len <= SKU_MAX_LEN {
            break;
        }
        let part = components.get_mut(*component);
        // Components are ASCII, so byte and char lengths agree.
        let keep = part.len().saturating_sub(len - SKU_MAX_LEN);
        part.truncate(keep);
        code = components.assemble(family, assembly);
    }

    let code = clamp(&code);
    debug!(%version, description, code = code.as_str(), "sku generated");
    code
}

/// Generate a SKU with the default algorithm version.
pub fn generate_sku(description: &str, family: &str) -> String {
    generate_sku_versioned(description, family, SkuVersion::default())
}

/// Generate one SKU item per non-empty line of `text`.
pub fn generate_sku_items(text: &str, family: &str, version: SkuVersion) -> Vec<SkuItem> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| SkuItem::new(generate_sku_versioned(line, family, version), line, family))
        .collect()
}

/// Check a family code can prefix a SKU.
///
/// Family codes are non-empty, uppercase ASCII letters or digits, and leave
/// room for at least one more character.
pub fn validate_family(code: &str) -> Result<()> {
    let invalid = |reason: &str| CalcError::InvalidFamily {
        code: code.to_string(),
        reason: reason.to_string(),
    };

    if code.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(invalid("only uppercase letters and digits are allowed"));
    }
    if code.len() >= SKU_MAX_LEN {
        return Err(invalid("leaves no room for the rest of the code"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TAPE: &str = "Cinta adhesiva doble cara 25mm";

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description("Cojín de lino, 45x45!"), "COJIN DE LINO 45X45");
        assert_eq!(clean_description("Piñata"), "PINATA");
    }

    #[test]
    fn test_reference_description_keeps_family() {
        for version in [SkuVersion::V2, SkuVersion::V3, SkuVersion::V3_1] {
            let code = generate_sku_versioned(TAPE, "CNSM", version);
            assert!(code.len() <= SKU_MAX_LEN, "{version}: {code}");
            assert!(code.starts_with("CNSM"), "{version}: {code}");
            assert_eq!(code, generate_sku_versioned(TAPE, "CNSM", version));
        }
    }

    #[test]
    fn test_reference_description_per_version() {
        assert_eq!(generate_sku_versioned(TAPE, "CNSM", SkuVersion::V3_1), "CNSMCNT25");
        assert_eq!(generate_sku_versioned(TAPE, "CNSM", SkuVersion::V3), "CNSMCNT25A");
        assert_eq!(generate_sku_versioned(TAPE, "CNSM", SkuVersion::V2), "CNSMCNTA25");
        assert_eq!(generate_sku(TAPE, "CNSM"), "CNSMCNT25");
    }

    #[test]
    fn test_empty_description_is_generic() {
        assert_eq!(generate_sku("", "CNSM"), "CNSMGEN");
        assert_eq!(generate_sku("de la con", "CNSM"), "CNSMGEN");
        assert_eq!(generate_sku("¡¿?!", "ABCDEFGH"), "ABCDEFGHGE");
    }

    #[test]
    fn test_root_keeps_vowel_only_word() {
        assert_eq!(generate_sku("AEIOU", "F"), "FAEI");
        assert_eq!(generate_sku_versioned("AEIOU", "F", SkuVersion::V2), "FAEIO");
    }

    #[test]
    fn test_numbers_capped_in_v3_1() {
        assert_eq!(generate_sku("Funda 45x45 cm", "COJ"), "COJFND454");
    }

    #[test]
    fn test_numbers_truncated_before_root() {
        // V3: CNSM + BLS + 123456 + G = 14 chars.
        // Attributes go first (-1), then numbers lose 3.
        assert_eq!(
            generate_sku_versioned("Bolsa 123456 grande", "CNSM", SkuVersion::V3),
            "CNSMBLS123"
        );
    }

    #[test]
    fn test_root_truncated_last() {
        assert_eq!(
            generate_sku_versioned("Bolsa 123456789", "ABCDEFGH", SkuVersion::V2),
            "ABCDEFGHBL"
        );
    }

    #[test]
    fn test_attributes_skip_numeric_words() {
        assert_eq!(extract_attributes(&["COJIN", "45", "LINO", "AZUL"]), "LA");
    }

    #[test]
    fn test_long_family_is_clamped() {
        let code = generate_sku("Cojín", "ABCDEFGHIJKL");
        assert_eq!(code, "ABCDEFGHIJ");
    }

    #[test]
    fn test_generate_items_skips_blank_lines() {
        let items = generate_sku_items("Cinta 25mm\n\n  \n  Bolsa grande  ", "CNSM", SkuVersion::V3_1);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].description, "Bolsa grande");
        assert_eq!(items[1].family, "CNSM");
        assert!(items.iter().all(SkuItem::is_length_valid));
    }

    #[test]
    fn test_version_labels() {
        assert_eq!(SkuVersion::from_label("v3.1"), Some(SkuVersion::V3_1));
        assert_eq!(SkuVersion::from_label("2"), Some(SkuVersion::V2));
        assert_eq!(SkuVersion::from_label("V3"), Some(SkuVersion::V3));
        assert_eq!(SkuVersion::from_label("v4"), None);
    }

    #[test]
    fn test_validate_family() {
        assert!(validate_family("CNSM").is_ok());
        assert!(validate_family("").is_err());
        assert!(validate_family("cnsm").is_err());
        assert!(validate_family("ABCDEFGHIJ").is_err());
    }
}
