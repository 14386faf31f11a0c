use std::path::{Path, PathBuf};

use gfonts_store::models::{FontStyle, NewVariant};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{
    CatalogError,
    derive_variant_shape,
    load_font_catalog,
    load_icon_catalog,
    new_font,
    read_tag_metadata,
    stream_font_tags,
    stream_variant_tags,
};
use crate::store::{CatalogWriter, InsertOutcome, SqliteFontStore};

use super::{ControlError, FontsControlPlane};

/// Input files consumed by the database builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInputs {
    pub font_catalog: PathBuf,
    pub icon_catalog: PathBuf,
    pub tag_metadata: PathBuf,
    pub font_tags: PathBuf,
    pub variant_tags: PathBuf,
}

impl BuildInputs {
    /// Fails on the first input that is not a readable file.
    ///
    /// # Errors
    /// Returns `CatalogError::Io` naming the missing input.
    pub fn check(&self) -> Result<(), CatalogError> {
        for path in [
            &self.font_catalog,
            &self.tag_metadata,
            &self.font_tags,
            &self.variant_tags,
            &self.icon_catalog,
        ] {
            std::fs::metadata(path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Row counters for one load step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub malformed: usize,
    pub unresolved: usize,
}

impl StepReport {
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.duplicates + self.malformed + self.unresolved
    }

    fn record(&mut self, outcome: InsertOutcome) {
        if outcome.is_inserted() {
            self.inserted += 1;
        } else {
            self.duplicates += 1;
        }
    }

    fn log(&self, step: &str) {
        info!(
            step,
            inserted = self.inserted,
            duplicates = self.duplicates,
            malformed = self.malformed,
            unresolved = self.unresolved,
            "load step finished"
        );
    }
}

/// Summary of a full database load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadReport {
    pub fonts: StepReport,
    pub variants: StepReport,
    pub tags: StepReport,
    pub font_tags: StepReport,
    pub variant_tags: StepReport,
    pub icons: StepReport,
    pub icon_variants: StepReport,
}

/// Rebuilds the relational store from the catalog and tag inputs.
#[derive(Debug, Clone)]
pub struct DatabaseBuilder {
    inputs: BuildInputs,
}

impl DatabaseBuilder {
    #[must_use]
    pub const fn new(inputs: BuildInputs) -> Self {
        Self { inputs }
    }

    /// Deletes any store at `path`, recreates it, and loads every input.
    ///
    /// # Errors
    /// Returns `ControlError` if an input is missing or malformed, or a store
    /// operation fails. Individual malformed CSV rows are skipped, not fatal.
    pub fn build(&self, path: &Path) -> Result<(SqliteFontStore, LoadReport), ControlError> {
        self.inputs.check()?;
        let store = SqliteFontStore::create_fresh(path)?;
        let report = self.load_into(&store)?;
        Ok((store, report))
    }

    /// Loads every input into an existing store, in dependency order.
    ///
    /// # Errors
    /// Returns `ControlError` if an input is missing or malformed, or a store
    /// operation fails.
    pub fn load_into(&self, store: &SqliteFontStore) -> Result<LoadReport, ControlError> {
        let mut report = LoadReport::default();
        self.load_fonts(store, &mut report)?;
        self.load_tags(store, &mut report.tags)?;
        self.load_font_tags(store, &mut report.font_tags)?;
        self.load_variant_tags(store, &mut report.variant_tags)?;
        self.load_icons(store, &mut report)?;
        Ok(report)
    }

    fn load_fonts(&self, store: &SqliteFontStore, report: &mut LoadReport) -> Result<(), ControlError> {
        let catalog = load_font_catalog(&self.inputs.font_catalog)?;
        store.write(|writer| -> Result<(), ControlError> {
            for font in &catalog.items {
                let outcome = writer.insert_font(&new_font(font))?;
                report.fonts.record(outcome);
                for label in &font.variants {
                    let Some(shape) = derive_variant_shape(label) else {
                        warn!(family = %font.family, variant = %label, "variant label has no weight");
                        report.variants.malformed += 1;
                        continue;
                    };
                    writer.insert_variant(&NewVariant {
                        font_id: outcome.id(),
                        name: label.clone(),
                        style: shape.style,
                        weight: shape.weight,
                        url: font.files.get(label).cloned(),
                    })?;
                    report.variants.inserted += 1;
                }
            }
            Ok(())
        })?;
        report.fonts.log("fonts");
        report.variants.log("variants");
        Ok(())
    }

    fn load_tags(&self, store: &SqliteFontStore, step: &mut StepReport) -> Result<(), ControlError> {
        let (tags, skipped) = read_tag_metadata(&self.inputs.tag_metadata)?;
        step.malformed += skipped;
        store.write(|writer| -> Result<(), ControlError> {
            for tag in &tags {
                step.record(writer.insert_tag(&tag.name, &tag.description)?);
            }
            Ok(())
        })?;
        step.log("tags");
        Ok(())
    }

    fn load_font_tags(&self, store: &SqliteFontStore, step: &mut StepReport) -> Result<(), ControlError> {
        let rows = stream_font_tags(&self.inputs.font_tags)?;
        store.write(|writer| -> Result<(), ControlError> {
            for row in rows {
                let Some(row) = row? else {
                    step.malformed += 1;
                    continue;
                };
                let Some(font_id) = writer.font_id(&row.family)? else {
                    step.unresolved += 1;
                    continue;
                };
                let Some(tag_id) = writer.tag_id(&row.tag)? else {
                    step.unresolved += 1;
                    continue;
                };
                if writer.insert_font_tag(font_id, tag_id, row.value)? {
                    step.inserted += 1;
                } else {
                    step.duplicates += 1;
                }
            }
            Ok(())
        })?;
        step.log("font_tags");
        Ok(())
    }

    fn load_variant_tags(&self, store: &SqliteFontStore, step: &mut StepReport) -> Result<(), ControlError> {
        let rows = stream_variant_tags(&self.inputs.variant_tags)?;
        store.write(|writer| -> Result<(), ControlError> {
            for row in rows {
                let Some(row) = row? else {
                    step.malformed += 1;
                    continue;
                };
                let Some(variant_id) = resolve_variant(writer, &row.family, row.weight, row.style)? else {
                    step.unresolved += 1;
                    continue;
                };
                let Some(tag_id) = writer.tag_id(&row.tag)? else {
                    step.unresolved += 1;
                    continue;
                };
                if writer.insert_variant_tag(variant_id, tag_id, row.value)? {
                    step.inserted += 1;
                } else {
                    step.duplicates += 1;
                }
            }
            Ok(())
        })?;
        step.log("variant_tags");
        Ok(())
    }

    fn load_icons(&self, store: &SqliteFontStore, report: &mut LoadReport) -> Result<(), ControlError> {
        let icons = load_icon_catalog(&self.inputs.icon_catalog)?;
        store.write(|writer| -> Result<(), ControlError> {
            for icon in &icons {
                let outcome = writer.insert_icon(&icon.name, &icon.category, icon.codepoint.as_deref())?;
                report.icons.record(outcome);
                for variant in &icon.variants {
                    for path in &variant.paths {
                        writer.insert_icon_variant(outcome.id(), &variant.style, path)?;
                        report.icon_variants.inserted += 1;
                    }
                }
            }
            Ok(())
        })?;
        report.icons.log("icons");
        report.icon_variants.log("icon_variants");
        Ok(())
    }
}

fn resolve_variant(
    writer: &CatalogWriter<'_>,
    family: &str,
    weight: i64,
    style: FontStyle,
) -> Result<Option<i64>, ControlError> {
    let Some(font_id) = writer.font_id(family)? else {
        return Ok(None);
    };
    Ok(writer.variant_id(font_id, weight, style)?)
}

impl FontsControlPlane {
    /// Rebuilds the store at `path` from `inputs` and returns a control plane over it.
    ///
    /// # Errors
    /// Returns `ControlError` if the build fails.
    pub async fn build_database(
        inputs: BuildInputs,
        path: PathBuf,
    ) -> Result<(Self, LoadReport), ControlError> {
        let (store, report) =
            tokio::task::spawn_blocking(move || DatabaseBuilder::new(inputs).build(&path)).await??;
        let control = Self::new(store);
        let orphans = control.orphan_counts().await?;
        if orphans.total() > 0 {
            warn!(?orphans, "store contains rows without a parent");
        }
        Ok((control, report))
    }
}
