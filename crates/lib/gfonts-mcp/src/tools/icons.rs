use gfonts_core::store::IconFilter;
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

/// Parameters for searching icons. All supplied filters must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchIconsParams {
    /// Substring of the icon name.
    pub name: Option<String>,
    /// Substring of the icon category.
    pub category: Option<String>,
}

#[tool_router(router = tool_router_icons, vis = "pub")]
impl GfontsMcp {
    #[tool(description = "Search icons by name and category.")]
    async fn search_icons(
        &self,
        Parameters(params): Parameters<SearchIconsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let filter = IconFilter {
            name: params.name,
            category: params.category,
        };
        let icons = self
            .control()
            .search_icons(filter)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(icons)?]))
    }

    #[tool(description = "List the distinct icon categories.")]
    async fn get_icon_categories(&self) -> Result<CallToolResult, ErrorData> {
        let categories = self
            .control()
            .icon_categories()
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(categories)?]))
    }

    #[tool(description = "List the distinct icon rendering styles.")]
    async fn get_icon_styles(&self) -> Result<CallToolResult, ErrorData> {
        let styles = self
            .control()
            .icon_styles()
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(styles)?]))
    }
}
