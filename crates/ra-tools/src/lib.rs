//! ra-tools: Function Tools and Web Search
//!
//! Provides the tool registry the run orchestrator dispatches through,
//! the web search provider adapter and the built-in `web_search` tool.

pub mod builtin;
pub mod registry;
pub mod search;
pub mod tool;

// Re-export main types
pub use builtin::{register_builtin_tools, WebSearchTool, WEB_SEARCH_TOOL};
pub use registry::{ToolDefinition, ToolRegistry};
pub use search::{BingSearchClient, SearchProvider, SearchResult, SearchResults};
pub use tool::{BoxedTool, SimpleTool, Tool};
