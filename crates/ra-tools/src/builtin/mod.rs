//! Built-in tools

pub mod web_search;

pub use web_search::{WebSearchTool, WEB_SEARCH_TOOL};

use std::sync::Arc;
use tracing::info;

use crate::registry::ToolRegistry;
use crate::search::SearchProvider;

/// Register the built-in tools that have their dependencies available
pub fn register_builtin_tools(registry: &mut ToolRegistry, search: Option<Arc<dyn SearchProvider>>) {
    if let Some(provider) = search {
        registry.register(Arc::new(WebSearchTool::new(provider)));
        info!("Registered {} tool", WEB_SEARCH_TOOL);
    } else {
        info!("No search provider configured, {} unavailable", WEB_SEARCH_TOOL);
    }
}
