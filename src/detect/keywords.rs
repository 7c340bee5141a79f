//! Keyword table used to score column names.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

#[rustfmt::skip]
const WIDTH_KEYWORDS: &[&str] = &[
    "ancho", "width", "anchura", "breadth", "wide",
    "lado1", "lado 1", "lado_1", "lado-1",
    "lado a", "lado_a", "lado-a", "side1", "side 1", "side a",
    "medida1", "medida 1", "medida a",
    "w", "a", "x", "base", "horizontal", "wd", "wdt",
];

#[rustfmt::skip]
const HEIGHT_KEYWORDS: &[&str] = &[
    "alto", "height", "altura", "largo", "longitud", "length", "high", "tall",
    "lado2", "lado 2", "lado_2", "lado-2",
    "lado b", "lado_b", "lado-b", "side2", "side 2", "side b",
    "medida2", "medida 2", "medida b",
    "h", "b", "y", "vertical", "ht", "hgt", "len",
];

/// Lowercase, strip diacritics and trim a column name.
pub fn normalize_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Keywords that mark a column as width or height.
///
/// Loadable from JSON so the table can grow without code changes:
///
/// ```json
/// { "width": ["ancho", "w"], "height": ["alto", "h"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub width: Vec<String>,
    pub height: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            width: WIDTH_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            height: HEIGHT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeywordTable {
    /// Add keywords to the built-in table.
    pub fn extended_with(mut self, other: KeywordTable) -> Self {
        self.width.extend(other.width);
        self.height.extend(other.height);
        self
    }

    /// Normalized copy of the table, with duplicates removed.
    pub(crate) fn normalized(&self) -> KeywordTable {
        KeywordTable {
            width: normalize_list(&self.width),
            height: normalize_list(&self.height),
        }
    }
}

fn normalize_list(keywords: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let k = normalize_name(keyword);
        if !k.is_empty() && !out.contains(&k) {
            out.push(k);
        }
    }
    out
}
