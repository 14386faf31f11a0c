//! Fixed file layout of the pipeline inputs and outputs under a data root.

use std::path::{Path, PathBuf};

use crate::catalog::IconCollector;
use crate::control::BuildInputs;

pub const FONT_CATALOG_FILE: &str = "google-fonts.json";
pub const ICON_CATALOG_FILE: &str = "icons.json";
pub const DATABASE_FILE: &str = "google_fonts.sqlite";
pub const TAG_METADATA_FILE: &str = "third_party/fonts/tags/tags_metadata.csv";
pub const FONT_TAGS_FILE: &str = "third_party/fonts/tags/all/families.csv";
pub const VARIANT_TAGS_FILE: &str = "third_party/fonts/tags/all/quant.csv";
pub const ICON_SOURCE_DIR: &str = "third_party/icons/src";
pub const ICON_FONT_DIR: &str = "third_party/icons/font";
pub const ICON_VARIABLE_FONT_DIR: &str = "third_party/icons/variablefont";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn font_catalog(&self) -> PathBuf {
        self.root.join(FONT_CATALOG_FILE)
    }

    #[must_use]
    pub fn icon_catalog(&self) -> PathBuf {
        self.root.join(ICON_CATALOG_FILE)
    }

    #[must_use]
    pub fn database(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    #[must_use]
    pub fn build_inputs(&self) -> BuildInputs {
        BuildInputs {
            font_catalog: self.font_catalog(),
            icon_catalog: self.icon_catalog(),
            tag_metadata: self.root.join(TAG_METADATA_FILE),
            font_tags: self.root.join(FONT_TAGS_FILE),
            variant_tags: self.root.join(VARIANT_TAGS_FILE),
        }
    }

    #[must_use]
    pub fn icon_collector(&self) -> IconCollector {
        IconCollector::new(self.root.join(ICON_SOURCE_DIR))
            .with_codepoint_dir(self.root.join(ICON_FONT_DIR))
            .with_codepoint_dir(self.root.join(ICON_VARIABLE_FONT_DIR))
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
