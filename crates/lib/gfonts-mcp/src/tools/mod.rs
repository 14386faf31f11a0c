//! MCP tool modules.
//!
//! Tools are grouped by domain: font and tag searches, and icon searches with
//! their distinct-value listings.

pub mod fonts;
pub mod icons;

#[cfg(test)]
pub(crate) mod test_support {
    use gfonts_core::control::{ControlError, FontsControlPlane};
    use gfonts_core::store::SqliteFontStore;
    use gfonts_store::models::{FontStyle, NewFont, NewVariant};
    use rmcp::model::CallToolResult;
    use serde_json::Value;

    use crate::GfontsMcp;

    fn font(family: &str, category: &str, is_variable: bool) -> NewFont {
        NewFont {
            family: family.to_string(),
            subsets: "latin".to_string(),
            category: category.to_string(),
            version: "v1".to_string(),
            last_modified: "2024-01-01".to_string(),
            default_variant: "regular".to_string(),
            is_variable,
        }
    }

    /// Server over an in-memory store holding two fonts, two tags and two icons.
    pub fn server() -> GfontsMcp {
        let store = SqliteFontStore::open_in_memory().expect("open store");
        store
            .write(|writer| -> Result<(), ControlError> {
                let roboto = writer.insert_font(&font("Roboto", "sans-serif", true))?.id();
                let lobster = writer.insert_font(&font("Lobster", "display", false))?.id();
                writer.insert_variant(&NewVariant {
                    font_id: roboto,
                    name: "regular".to_string(),
                    style: FontStyle::Normal,
                    weight: 400,
                    url: None,
                })?;
                let calm = writer.insert_tag("/Expressive/Calm", "Calm")?.id();
                let loud = writer.insert_tag("/Expressive/Loud", "Loud")?.id();
                writer.insert_font_tag(roboto, calm, 80.0)?;
                writer.insert_font_tag(roboto, loud, 10.0)?;
                writer.insert_font_tag(lobster, loud, 90.0)?;
                let home = writer.insert_icon("home", "action", Some("e88a"))?.id();
                writer.insert_icon_variant(home, "materialicons", "action/home/materialicons/24px.svg")?;
                writer.insert_icon_variant(home, "materialiconsround", "action/home/materialiconsround/24px.svg")?;
                writer.insert_icon("alarm", "device", None)?;
                Ok(())
            })
            .expect("seed store");
        GfontsMcp::new(FontsControlPlane::new(store))
    }

    /// Decodes the JSON array carried as text in the first content item.
    pub fn rows(result: &CallToolResult) -> Vec<Value> {
        let envelope = serde_json::to_value(result).expect("serialize result");
        assert_eq!(envelope["content"][0]["type"], "text");
        let text = envelope["content"][0]["text"]
            .as_str()
            .expect("text content");
        serde_json::from_str(text).expect("content is JSON")
    }
}
