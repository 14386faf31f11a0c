//! Shapes of the JSON catalog files exchanged between pipeline stages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level font catalog document as returned by the web-fonts API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontCatalog {
    pub items: Vec<CatalogFont>,
}

/// One font family record from the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFont {
    pub family: String,
    #[serde(default)]
    pub subsets: Vec<String>,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub files: HashMap<String, String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_variant: Option<String>,
    #[serde(default)]
    pub is_variable: bool,
}

/// One icon with its style variants, as written by the icon collector.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconRecord {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub variants: Vec<IconStyleVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codepoint: Option<String>,
}

/// Asset paths of an icon for one rendering style.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconStyleVariant {
    pub style: String,
    #[serde(default)]
    pub paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_font_reads_camel_case_fields() {
        let json = r#"{
            "items": [{
                "family": "Roboto",
                "subsets": ["latin"],
                "variants": ["regular", "700italic"],
                "files": {"regular": "https://example.test/r.ttf"},
                "category": "sans-serif",
                "version": "v30",
                "lastModified": "2024-01-01",
                "kind": "webfonts#webfont"
            }]
        }"#;
        let catalog: FontCatalog = serde_json::from_str(json).expect("catalog should parse");
        let font = &catalog.items[0];
        assert_eq!(font.last_modified, "2024-01-01");
        assert_eq!(font.default_variant, None);
        assert!(!font.is_variable);
        assert_eq!(font.files.len(), 1);
    }

    #[test]
    fn icon_record_omits_missing_codepoint() {
        let icon = IconRecord {
            name: "search".to_string(),
            category: "action".to_string(),
            variants: vec![IconStyleVariant {
                style: "materialicons".to_string(),
                paths: vec!["action/search/materialicons/24px.svg".to_string()],
            }],
            codepoint: None,
        };
        let value = serde_json::to_value(&icon).expect("icon should serialize");
        assert!(value.get("codepoint").is_none());
        assert_eq!(value["variants"][0]["style"], "materialicons");
    }
}
