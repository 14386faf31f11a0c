use gfonts_core::store::FontFilter;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::GfontsMcp;
use crate::helpers;

/// Parameters for searching fonts. All supplied filters must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchFontsParams {
    /// Substring of the font family name.
    pub name: Option<String>,
    /// Substring of a classification tag name, e.g. `Calm`.
    pub tag: Option<String>,
    /// Substring of the font category, e.g. `serif`.
    pub category: Option<String>,
    /// Restrict to variable (`true`) or static (`false`) fonts.
    pub is_variable: Option<bool>,
}

impl From<SearchFontsParams> for FontFilter {
    fn from(params: SearchFontsParams) -> Self {
        Self {
            name: params.name,
            tag: params.tag,
            category: params.category,
            is_variable: params.is_variable,
        }
    }
}

/// Parameters for listing tag names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchFontTagsParams {
    /// Substring of the tag name.
    pub name: Option<String>,
}

#[tool_router(router = tool_router_fonts, vis = "pub")]
impl GfontsMcp {
    #[tool(description = "Search fonts by family name, tag, category, and variable flag.")]
    async fn search_fonts(
        &self,
        Parameters(params): Parameters<SearchFontsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let fonts = self
            .control()
            .search_fonts(params.into())
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(fonts)?]))
    }

    #[tool(description = "List font classification tag names, optionally filtered by name.")]
    async fn search_font_tags(
        &self,
        Parameters(params): Parameters<SearchFontTagsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let tags = self
            .control()
            .search_font_tags(params.name)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(tags)?]))
    }
}
