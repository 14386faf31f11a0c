use std::path::Path;

use gfonts_store::catalog::{CatalogFont, FontCatalog};
use gfonts_store::models::{FontStyle, NewFont};
use gfonts_store::schema::{DEFAULT_VARIANT, DEFAULT_WEIGHT};

use super::{CatalogError, leading_integer, read_to_string};

/// Style and weight derived from a variant label such as `700italic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantShape {
    pub style: FontStyle,
    pub weight: i64,
}

/// Derives style and numeric weight from a catalog variant label.
///
/// `regular` and `italic` map to weight 400. Any other label must start with
/// a weight once `italic` is removed; labels that do not yield `None`.
#[must_use]
pub fn derive_variant_shape(label: &str) -> Option<VariantShape> {
    let style = if label.contains("italic") {
        FontStyle::Italic
    } else {
        FontStyle::Normal
    };
    let weight = if label == "regular" || label == "italic" {
        DEFAULT_WEIGHT
    } else {
        leading_integer(&label.replacen("italic", "", 1))?
    };
    Some(VariantShape { style, weight })
}

/// Builds the font row for a catalog record.
#[must_use]
pub fn new_font(font: &CatalogFont) -> NewFont {
    NewFont {
        family: font.family.clone(),
        subsets: font.subsets.join(","),
        category: font.category.clone(),
        version: font.version.clone(),
        last_modified: font.last_modified.clone(),
        default_variant: font
            .default_variant
            .clone()
            .unwrap_or_else(|| DEFAULT_VARIANT.to_string()),
        is_variable: font.is_variable,
    }
}

/// Reads the font catalog document written by the catalog fetcher.
///
/// # Errors
/// Returns `CatalogError` if the file is missing or is not a catalog document.
pub fn load_font_catalog(path: &Path) -> Result<FontCatalog, CatalogError> {
    let json = read_to_string(path)?;
    serde_json::from_str(&json).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}
