//! Article names in the `FAMILY WxH FINISH FABRIC COLOR` layout.

use serde::{Deserialize, Serialize};

/// Product families offered for article names, with their labels.
pub const KNOWN_FAMILIES: &[(&str, &str)] = &[
    ("COJ", "Cojín Completo"),
    ("FUN", "Funda Cojín"),
    ("REL", "Relleno"),
    ("COL", "Colcha"),
    ("PLA", "Plaid"),
];

/// Edge finish of a cushion cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Finish {
    /// No piping.
    #[default]
    WithoutPiping,
    /// With piping.
    WithPiping,
    /// Flanged edge.
    Flange,
    /// Zip closure.
    Zipper,
}

impl Finish {
    /// Label used in the article name.
    pub fn label(&self) -> &'static str {
        match self {
            Finish::WithoutPiping => "S/VIVO",
            Finish::WithPiping => "C/VIVO",
            Finish::Flange => "PESTAÑA",
            Finish::Zipper => "CREMALLERA",
        }
    }

    /// Parse a label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "S/VIVO" => Some(Finish::WithoutPiping),
            "C/VIVO" => Some(Finish::WithPiping),
            "PESTAÑA" | "PESTANA" => Some(Finish::Flange),
            "CREMALLERA" => Some(Finish::Zipper),
            _ => None,
        }
    }
}

/// Parts of an article name. Empty parts are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleName {
    pub family: String,
    pub width: String,
    pub height: String,
    pub finish: Option<Finish>,
    pub fabric: String,
    pub color: String,
}

impl ArticleName {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            finish: Some(Finish::default()),
            ..Default::default()
        }
    }

    /// Compose the name. A missing side of the size is written as `00`.
    pub fn compose(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.family.is_empty() {
            parts.push(self.family.to_uppercase());
        }

        let width = self.width.trim();
        let height = self.height.trim();
        if !width.is_empty() || !height.is_empty() {
            let w = if width.is_empty() { "00" } else { width };
            let h = if height.is_empty() { "00" } else { height };
            parts.push(format!("{w}X{h}"));
        }

        if let Some(finish) = self.finish {
            parts.push(finish.label().to_string());
        }

        for text in [&self.fabric, &self.color] {
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text.to_uppercase());
            }
        }

        parts.join(" ")
    }
}

impl std::fmt::Display for ArticleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.compose())
    }
}
