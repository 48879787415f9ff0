//! `web_search` function tool backed by a [`SearchProvider`]

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::search::{SearchProvider, DEFAULT_NUM_RESULTS, MAX_SEARCH_RESULTS};
use crate::tool::Tool;

pub const WEB_SEARCH_TOOL: &str = "web_search";

#[derive(Debug, Deserialize)]
struct WebSearchArgs {
    query: String,
    #[serde(default = "default_num_results")]
    num_results: u32,
}

fn default_num_results() -> u32 {
    DEFAULT_NUM_RESULTS
}

/// Searches the web for current information
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Search the web for current information on a topic. Use this for recent events, \
         facts not covered by the provided documents, or to corroborate sources."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return",
                    "default": DEFAULT_NUM_RESULTS,
                    "minimum": 1,
                    "maximum": MAX_SEARCH_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args: WebSearchArgs =
            serde_json::from_value(input).context("web_search expects {query, num_results}")?;

        // Provider failures are part of the answer, not an error of the call.
        match self.provider.search(&args.query, args.num_results).await {
            Ok(results) => Ok(serde_json::to_value(results)?),
            Err(e) => {
                warn!("web_search failed for {:?}: {}", args.query, e);
                Ok(json!({ "error": e.to_string() }))
            }
        }
    }
}
