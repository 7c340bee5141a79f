//! Fuzzy scoring of column names to find width and height.

use std::cmp::Ordering;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::keywords::{normalize_name, KeywordTable};
use crate::model::SourceRow;

/// Score for a name equal to the keyword.
const SCORE_EXACT: i32 = 100;
/// Score for a multi-character keyword found as a token.
const SCORE_TOKEN: i32 = 95;
/// Score for a name starting with the keyword followed by a non-letter.
const SCORE_PREFIX: i32 = 90;
/// Score for a single-character keyword found as a token.
const SCORE_SHORT_TOKEN: i32 = 85;
/// Score for a keyword longer than two characters found anywhere.
const SCORE_SUBSTRING: i32 = 70;
/// Score for a column whose value is not a number.
const SCORE_NOT_NUMERIC: i32 = -1;

/// Width and height found in a row, both positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy)]
struct ScoredColumn<'a> {
    key: &'a str,
    score: i32,
    value: f64,
}

/// Parse a cell as a number.
///
/// Numbers are taken as is. Strings yield their leading numeric prefix
/// (`"50 cm"` is 50). Anything else, or a non-finite value, is `None`.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Score a normalized name against normalized keywords.
fn score_name(name: &str, keywords: &[String]) -> i32 {
    let tokens: Vec<&str> = name
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|t| !t.is_empty())
        .collect();

    let mut score = 0;
    for k in keywords {
        if name == k {
            return SCORE_EXACT;
        }

        let k_len = k.chars().count();

        if tokens.contains(&k.as_str()) {
            let token_score = if k_len == 1 {
                SCORE_SHORT_TOKEN
            } else {
                SCORE_TOKEN
            };
            score = score.max(token_score);
        }

        if let Some(rest) = name.strip_prefix(k.as_str()) {
            if rest.chars().next().is_some_and(|c| !c.is_ascii_lowercase()) {
                score = score.max(SCORE_PREFIX);
            }
        }

        if k_len > 2 && name.contains(k.as_str()) {
            score = score.max(SCORE_SUBSTRING);
        }
    }

    score
}

/// Detects width and height columns using a keyword table.
#[derive(Debug, Clone)]
pub struct DimensionDetector {
    keywords: KeywordTable,
}

impl Default for DimensionDetector {
    fn default() -> Self {
        Self::new(&KeywordTable::default())
    }
}

impl DimensionDetector {
    /// Create a detector for the given table.
    pub fn new(keywords: &KeywordTable) -> Self {
        Self {
            keywords: keywords.normalized(),
        }
    }

    /// Score one field against a keyword list; non-numeric values score -1.
    pub fn score_field(&self, name: &str, value: &Value, keywords: &[String]) -> i32 {
        if parse_numeric(value).is_none() {
            return SCORE_NOT_NUMERIC;
        }
        score_name(&normalize_name(name), keywords)
    }

    /// Score of a field as a width column.
    pub fn width_score(&self, name: &str, value: &Value) -> i32 {
        self.score_field(name, value, &self.keywords.width)
    }

    /// Score of a field as a height column.
    pub fn height_score(&self, name: &str, value: &Value) -> i32 {
        self.score_field(name, value, &self.keywords.height)
    }

    /// Candidates sorted by score, best first. Ties are broken by column
    /// name so the outcome does not depend on field order.
    fn candidates<'a>(&self, row: &'a SourceRow, keywords: &[String]) -> Vec<ScoredColumn<'a>> {
        let mut candidates: Vec<ScoredColumn<'a>> = row
            .iter()
            .filter_map(|(key, value)| {
                let score = self.score_field(key, value, keywords);
                let value = parse_numeric(value)?;
                (score > 0).then_some(ScoredColumn {
                    key: key.as_str(),
                    score,
                    value,
                })
            })
            .collect();

        candidates.sort_by(|a, b| match b.score.cmp(&a.score) {
            Ordering::Equal => a.key.cmp(b.key),
            other => other,
        });
        candidates
    }

    /// Find the width and height of a row.
    ///
    /// Returns `None` when either axis has no numeric candidate, when the
    /// best candidates collide on one column with no alternative, or when a
    /// resolved value is not positive.
    pub fn detect(&self, row: &SourceRow) -> Option<Dimensions> {
        let widths = self.candidates(row, &self.keywords.width);
        let heights = self.candidates(row, &self.keywords.height);

        let mut best_width = *widths.first()?;
        let mut best_height = *heights.first()?;

        if best_width.key == best_height.key {
            let next_width = widths.get(1).copied();
            let next_height = heights.get(1).copied();

            let keep_width = best_width.score + next_height.map_or(0, |c| c.score);
            let keep_height = next_width.map_or(0, |c| c.score) + best_height.score;

            match (next_width, next_height) {
                (_, Some(height)) if keep_width >= keep_height => best_height = height,
                (Some(width), _) => best_width = width,
                _ => {
                    debug!(column = best_width.key, "width and height collide on one column");
                    return None;
                }
            }
        }

        if best_width.value <= 0.0 || best_height.value <= 0.0 {
            debug!(
                width = best_width.value,
                height = best_height.value,
                "non-positive dimensions rejected"
            );
            return None;
        }

        debug!(
            width_column = best_width.key,
            height_column = best_height.key,
            "dimensions detected"
        );
        Some(Dimensions {
            width: best_width.value,
            height: best_height.value,
        })
    }
}

/// Detect dimensions with the built-in keyword table.
pub fn detect_dimensions(row: &SourceRow) -> Option<Dimensions> {
    static DETECTOR: OnceLock<DimensionDetector> = OnceLock::new();
    DETECTOR.get_or_init(DimensionDetector::default).detect(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> SourceRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    fn dims(width: f64, height: f64) -> Option<Dimensions> {
        Some(Dimensions { width, height })
    }

    // ==================== parse_numeric ====================

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(&json!(50)), Some(50.0));
        assert_eq!(parse_numeric(&json!(40.5)), Some(40.5));
        assert_eq!(parse_numeric(&json!("  45")), Some(45.0));
        assert_eq!(parse_numeric(&json!("50 cm")), Some(50.0));
        assert_eq!(parse_numeric(&json!("40,5")), Some(40.0));
        assert_eq!(parse_numeric(&json!(".5")), Some(0.5));
        assert_eq!(parse_numeric(&json!("1e2x")), Some(100.0));
        assert_eq!(parse_numeric(&json!("-3")), Some(-3.0));
        assert_eq!(parse_numeric(&json!("text")), None);
        assert_eq!(parse_numeric(&json!("")), None);
        assert_eq!(parse_numeric(&json!(true)), None);
        assert_eq!(parse_numeric(&Value::Null), None);
    }

    // ==================== scoring ====================

    #[test]
    fn test_score_tiers() {
        let detector = DimensionDetector::default();
        let v = json!(10);
        assert_eq!(detector.width_score("Ancho", &v), 100);
        assert_eq!(detector.width_score("ANCHO (cm)", &v), 95);
        assert_eq!(detector.width_score("ancho_1", &v), 95);
        assert_eq!(detector.width_score("ancho1", &v), 90);
        assert_eq!(detector.width_score("medida w", &v), 85);
        assert_eq!(detector.width_score("anchototal", &v), 70);
        assert_eq!(detector.width_score("color", &v), 0);
        assert_eq!(detector.width_score("ancho", &json!("n/a")), -1);
    }

    #[test]
    fn test_single_letter_only_as_token() {
        let detector = DimensionDetector::default();
        // "a" is a width keyword but must not match inside words.
        assert_eq!(detector.width_score("cantidad", &json!(3)), 0);
        assert_eq!(detector.height_score("alto", &json!(3)), 100);
    }

    // ==================== detection ====================

    #[test]
    fn test_detect_spanish_headers() {
        let r = row(json!({"ancho": 50, "alto": 30}));
        assert_eq!(detect_dimensions(&r), dims(50.0, 30.0));
    }

    #[test]
    fn test_detect_single_letters_with_text_column() {
        let r = row(json!({"w": 50, "h": 30, "other": "text"}));
        assert_eq!(detect_dimensions(&r), dims(50.0, 30.0));
    }

    #[test]
    fn test_detect_missing_axis() {
        let r = row(json!({"ancho": 50, "referencia": "COJ-1"}));
        assert_eq!(detect_dimensions(&r), None);
    }

    #[test]
    fn test_detect_non_numeric_axis() {
        let r = row(json!({"ancho": 50, "alto": "grande"}));
        assert_eq!(detect_dimensions(&r), None);
    }

    #[test]
    fn test_detect_rejects_non_positive() {
        let r = row(json!({"ancho": 0, "alto": 30}));
        assert_eq!(detect_dimensions(&r), None);
        let r = row(json!({"ancho": 40, "alto": -2}));
        assert_eq!(detect_dimensions(&r), None);
    }

    #[test]
    fn test_detect_string_values() {
        let r = row(json!({"Anchura (cm)": "45", "Altura (cm)": "45,5"}));
        assert_eq!(detect_dimensions(&r), dims(45.0, 45.0));
    }

    #[test]
    fn test_detect_collision_falls_back_to_second_best() {
        // "ancho alto" is the best column for both axes; height moves to
        // the runner-up because that pairing scores higher.
        let r = row(json!({"ancho alto": 40, "tall2": 60}));
        assert_eq!(detect_dimensions(&r), dims(40.0, 60.0));
    }

    #[test]
    fn test_detect_collision_falls_back_to_second_width() {
        // Only width has a runner-up, so "ancho alto" stays the height.
        let r = row(json!({"ancho alto": 40, "w2": 30}));
        assert_eq!(detect_dimensions(&r), dims(30.0, 40.0));
    }

    #[test]
    fn test_detect_collision_without_alternative() {
        let r = row(json!({"medida x y": 40}));
        assert_eq!(detect_dimensions(&r), None);
    }

    #[test]
    fn test_detect_independent_of_field_order() {
        let a = row(json!({"lado 1": 30, "lado 2": 70, "wd": 35, "ht": 75}));
        let b = row(json!({"ht": 75, "wd": 35, "lado 2": 70, "lado 1": 30}));
        assert_eq!(detect_dimensions(&a), detect_dimensions(&b));
        assert!(detect_dimensions(&a).is_some());
    }

    #[test]
    fn test_custom_keywords() {
        let table = KeywordTable::default().extended_with(KeywordTable {
            width: vec!["breite".to_string()],
            height: vec!["hohe".to_string()],
        });
        let detector = DimensionDetector::new(&table);
        let r = row(json!({"Breite": 40, "Höhe": 50}));
        assert_eq!(detector.detect(&r), dims(40.0, 50.0));
        assert_eq!(detect_dimensions(&r), None);
    }
}
