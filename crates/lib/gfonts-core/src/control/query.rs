use gfonts_store::models::{
    DatabaseStats,
    Font,
    Icon,
    IconCategory,
    IconStyle,
    IconVariant,
    OrphanCounts,
    TagName,
    TagScore,
    Variant,
};

use crate::store::{FontFilter, IconFilter};

use super::{ControlError, FontsControlPlane};

impl FontsControlPlane {
    /// Searches fonts by family substring, tag substring, category, and variable flag.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn search_fonts(&self, filter: FontFilter) -> Result<Vec<Font>, ControlError> {
        self.run_blocking(move |store| Ok(store.search_fonts(&filter)?))
            .await
    }

    /// Searches icons by name and category substring.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn search_icons(&self, filter: IconFilter) -> Result<Vec<Icon>, ControlError> {
        self.run_blocking(move |store| Ok(store.search_icons(&filter)?))
            .await
    }

    /// Lists tag names, optionally narrowed by substring.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn search_font_tags(&self, name: Option<String>) -> Result<Vec<TagName>, ControlError> {
        self.run_blocking(move |store| Ok(store.search_font_tags(name.as_deref())?))
            .await
    }

    /// Lists distinct icon categories.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn icon_categories(&self) -> Result<Vec<IconCategory>, ControlError> {
        self.run_blocking(|store| Ok(store.icon_categories()?)).await
    }

    /// Lists distinct icon styles.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn icon_styles(&self) -> Result<Vec<IconStyle>, ControlError> {
        self.run_blocking(|store| Ok(store.icon_styles()?)).await
    }

    /// Counts fonts, variants, and icons.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn database_stats(&self) -> Result<DatabaseStats, ControlError> {
        self.run_blocking(|store| Ok(store.database_stats()?)).await
    }

    /// Counts child rows whose parent is missing.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn orphan_counts(&self) -> Result<OrphanCounts, ControlError> {
        self.run_blocking(|store| Ok(store.orphan_counts()?)).await
    }

    /// Loads a font by exact family together with its variants and family tags.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn font_details(
        &self,
        family: String,
    ) -> Result<Option<(Font, Vec<Variant>, Vec<TagScore>)>, ControlError> {
        self.run_blocking(move |store| {
            let Some(font) = store.font_by_family(&family)? else {
                return Ok(None);
            };
            let variants = store.variants_for_font(font.id)?;
            let tags = store.tags_for_font(font.id)?;
            Ok(Some((font, variants, tags)))
        })
        .await
    }

    /// Loads an icon by exact name together with its style asset paths.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn icon_details(&self, name: String) -> Result<Option<(Icon, Vec<IconVariant>)>, ControlError> {
        self.run_blocking(move |store| {
            let Some(icon) = store.icon_by_name(&name)? else {
                return Ok(None);
            };
            let variants = store.icon_variants_for_icon(icon.id)?;
            Ok(Some((icon, variants)))
        })
        .await
    }
}
