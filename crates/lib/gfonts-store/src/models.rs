use serde::{Deserialize, Serialize};

use crate::schema::{STYLE_ITALIC, STYLE_NORMAL};

/// A font family row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Font {
    pub id: i64,
    pub family: String,
    pub subsets: Option<String>,
    pub category: Option<String>,
    pub version: Option<String>,
    pub last_modified: Option<String>,
    pub default_variant: Option<String>,
    pub is_variable: bool,
}

/// One style/weight rendering of a font family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variant {
    pub id: i64,
    pub font_id: i64,
    pub name: String,
    pub style: String,
    pub weight: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Tag name as returned by tag searches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagName {
    pub name: String,
}

/// A tag attached to a font or variant together with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagScore {
    pub name: String,
    pub value: f64,
}

/// An icon row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Icon {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub codepoint: Option<String>,
}

/// One asset path of an icon in a given rendering style.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconVariant {
    pub id: i64,
    pub icon_id: i64,
    pub style: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconCategory {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconStyle {
    pub style: String,
}

/// Row counts for the primary tables.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseStats {
    pub fonts: u64,
    pub variants: u64,
    pub icons: u64,
}

/// Number of child rows whose parent row is missing, per relation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrphanCounts {
    pub variants: u64,
    pub font_tags_font: u64,
    pub font_tags_tag: u64,
    pub variant_tags_variant: u64,
    pub variant_tags_tag: u64,
    pub icon_variants: u64,
}

impl OrphanCounts {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.variants
            + self.font_tags_font
            + self.font_tags_tag
            + self.variant_tags_variant
            + self.variant_tags_tag
            + self.icon_variants
    }
}

/// Rendering style of a font variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => STYLE_NORMAL,
            Self::Italic => STYLE_ITALIC,
        }
    }
}

/// Font row to insert; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFont {
    pub family: String,
    pub subsets: String,
    pub category: String,
    pub version: String,
    pub last_modified: String,
    pub default_variant: String,
    pub is_variable: bool,
}

/// Variant row to insert for an existing font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariant {
    pub font_id: i64,
    pub name: String,
    pub style: FontStyle,
    pub weight: i64,
    pub url: Option<String>,
}
