//! MCP server implementation for gfonts-mcp.
//!
//! This crate wires the font control plane into rmcp tool handlers and exposes
//! the read-only search surface over the font and icon store.

mod helpers;
mod tools;
pub mod server;

use gfonts_core::control::FontsControlPlane;
use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool_handler,
};
use rmcp::model::{ServerCapabilities, ServerInfo};

pub use tools::fonts::{SearchFontTagsParams, SearchFontsParams};
pub use tools::icons::SearchIconsParams;

const SERVER_INSTRUCTIONS: &str = r"gfonts-mcp provides read-only search over a catalog of web fonts and icons.

Fonts:
- `search_fonts` filters by `name` (family substring), `tag` (tag-name substring), `category`
  (substring, e.g. `serif`) and `is_variable` (exact). All supplied filters must match.
- `search_font_tags` lists classification tag names, optionally narrowed by `name` substring.
  Tag names are paths such as `/Expressive/Calm`; pass a fragment of one as the `tag` filter.

Icons:
- `search_icons` filters by `name` and `category` substrings.
- `get_icon_categories` and `get_icon_styles` list the distinct values to filter on.

Notes:
- Substring filters are case-insensitive for ASCII and treat `%` and `_` literally.
- Every tool returns a JSON array of rows.";

/// MCP server wrapper around the font control plane and tool routers.
#[derive(Clone)]
pub struct GfontsMcp {
    tool_router: ToolRouter<Self>,
    control: FontsControlPlane,
}

impl GfontsMcp {
    #[must_use]
    pub fn new(control: FontsControlPlane) -> Self {
        let tool_router = Self::tool_router_fonts() + Self::tool_router_icons();
        Self {
            tool_router,
            control,
        }
    }

    pub(crate) const fn control(&self) -> &FontsControlPlane {
        &self.control
    }
}

#[tool_handler]
impl ServerHandler for GfontsMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use gfonts_core::store::SqliteFontStore;

    use super::*;

    #[test]
    fn router_exposes_exactly_the_search_tools() {
        let store = SqliteFontStore::open_in_memory().expect("open store");
        let server = GfontsMcp::new(FontsControlPlane::new(store));
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "get_icon_categories",
                "get_icon_styles",
                "search_font_tags",
                "search_fonts",
                "search_icons",
            ]
        );
    }

    #[test]
    fn server_info_enables_tools() {
        let store = SqliteFontStore::open_in_memory().expect("open store");
        let info = GfontsMcp::new(FontsControlPlane::new(store)).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(
            info.instructions
                .as_deref()
                .is_some_and(|text| text.contains("search_fonts"))
        );
    }
}
