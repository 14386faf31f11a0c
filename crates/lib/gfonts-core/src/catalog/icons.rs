use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gfonts_store::catalog::{IconRecord, IconStyleVariant};
use gfonts_store::schema::make_icon_path;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use super::{CatalogError, read_to_string};

const CODEPOINTS_EXTENSION: &str = "codepoints";

const DEPTH_CATEGORY: usize = 1;
const DEPTH_ICON: usize = 2;
const DEPTH_STYLE: usize = 3;
const DEPTH_ASSET: usize = 4;

/// Assembles the icon catalog from an on-disk asset tree.
///
/// The tree is laid out as `category/icon/style/asset`. Codepoints come from
/// `*.codepoints` files in the configured directories, one `name hex` pair
/// per line.
#[derive(Debug, Clone)]
pub struct IconCollector {
    source_root: PathBuf,
    codepoint_dirs: Vec<PathBuf>,
}

impl IconCollector {
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            codepoint_dirs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_codepoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.codepoint_dirs.push(dir.into());
        self
    }

    /// Walks the asset tree and attaches codepoints by exact icon name.
    ///
    /// # Errors
    /// Returns `CatalogError` if the asset tree or a codepoint directory cannot be read.
    pub fn collect(&self) -> Result<Vec<IconRecord>, CatalogError> {
        let codepoints = self.load_codepoints()?;
        let mut icons = self.walk_tree()?;
        for icon in &mut icons {
            icon.codepoint = codepoints.get(&icon.name).cloned();
        }
        info!(
            icons = icons.len(),
            codepoints = codepoints.len(),
            "collected icon catalog"
        );
        Ok(icons)
    }

    /// Reads every codepoint file; later files override earlier names.
    ///
    /// # Errors
    /// Returns `CatalogError` if a directory or file cannot be read.
    pub fn load_codepoints(&self) -> Result<HashMap<String, String>, CatalogError> {
        let mut codepoints = HashMap::new();
        for dir in &self.codepoint_dirs {
            for file in codepoint_files(dir)? {
                let content = read_to_string(&file)?;
                let before = codepoints.len();
                parse_codepoints(&content, &mut codepoints);
                debug!(
                    file = %file.display(),
                    added = codepoints.len() - before,
                    "read codepoint file"
                );
            }
        }
        Ok(codepoints)
    }

    fn walk_tree(&self) -> Result<Vec<IconRecord>, CatalogError> {
        let walker = WalkDir::new(&self.source_root)
            .min_depth(DEPTH_CATEGORY)
            .max_depth(DEPTH_ASSET)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));

        let mut icons: Vec<IconRecord> = Vec::new();
        let mut category = String::new();
        for entry in walker {
            let entry = entry?;
            let is_dir = entry.file_type().is_dir();
            let name = entry.file_name().to_string_lossy().into_owned();
            match entry.depth() {
                DEPTH_CATEGORY if is_dir => category = name,
                DEPTH_ICON if is_dir => icons.push(IconRecord {
                    name,
                    category: category.clone(),
                    variants: Vec::new(),
                    codepoint: None,
                }),
                DEPTH_STYLE if is_dir => {
                    if let Some(icon) = icons.last_mut() {
                        icon.variants.push(IconStyleVariant {
                            style: name,
                            paths: Vec::new(),
                        });
                    }
                }
                DEPTH_ASSET if !is_dir => {
                    let Some(icon) = icons.last_mut() else {
                        continue;
                    };
                    let Some(variant) = icon.variants.last_mut() else {
                        continue;
                    };
                    variant
                        .paths
                        .push(make_icon_path(&icon.category, &icon.name, &variant.style, &name));
                }
                _ => {}
            }
        }
        Ok(icons)
    }
}

/// Adds `name codepoint` pairs from one codepoint file; blank or short lines are skipped.
pub fn parse_codepoints(content: &str, into: &mut HashMap<String, String>) {
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(codepoint)) = (fields.next(), fields.next()) else {
            continue;
        };
        into.insert(name.to_string(), codepoint.to_string());
    }
}

/// Writes the icon catalog as pretty-printed JSON, replacing any existing file.
///
/// # Errors
/// Returns `CatalogError` if serialization or the write fails.
pub fn write_icon_catalog(icons: &[IconRecord], path: &Path) -> Result<(), CatalogError> {
    let json = serde_json::to_string_pretty(icons).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the icon catalog written by [`write_icon_catalog`].
///
/// # Errors
/// Returns `CatalogError` if the file is missing or malformed.
pub fn load_icon_catalog(path: &Path) -> Result<Vec<IconRecord>, CatalogError> {
    let json = read_to_string(path)?;
    serde_json::from_str(&json).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn codepoint_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == CODEPOINTS_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
