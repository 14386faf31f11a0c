//! Readers for the raw catalog inputs.
//!
//! Each reader turns an external input (font catalog JSON, icon asset tree,
//! tag CSV files) into the canonical shapes consumed by the database builder.

use std::{error::Error, fmt, io, path::PathBuf};

pub mod fonts;
pub mod icons;
pub mod tags;

pub use fonts::{VariantShape, derive_variant_shape, load_font_catalog, new_font};
pub use icons::{IconCollector, load_icon_catalog, write_icon_catalog};
pub use tags::{
    CsvRowStream,
    FontTagRow,
    TagMetadata,
    VariantTagRow,
    parse_style_weight,
    read_tag_metadata,
    stream_font_tags,
    stream_variant_tags,
};

#[derive(Debug)]
pub enum CatalogError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    Csv { path: PathBuf, source: csv::Error },
    Walk(walkdir::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to access {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "malformed JSON in {}: {source}", path.display())
            }
            Self::Csv { path, source } => write!(f, "failed to read CSV {}: {source}", path.display()),
            Self::Walk(err) => write!(f, "failed to walk icon tree: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Walk(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for CatalogError {
    fn from(err: walkdir::Error) -> Self {
        Self::Walk(err)
    }
}

pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses the leading run of ASCII digits, ignoring leading whitespace.
pub(crate) fn leading_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let end = trimmed
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
