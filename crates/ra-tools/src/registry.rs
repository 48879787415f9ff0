//! Tool Registry
//!
//! Maps function names to tool handlers. The orchestrator hands every
//! requested call to [`ToolRegistry::dispatch`], which always produces a
//! [`ToolOutput`]: failures become `{"error": ...}` payloads so the run can
//! fold them into its reasoning instead of stalling on a missing output.

use ra_llm::{ToolCall, ToolOutput};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::tool::BoxedTool;

/// Function definition advertised to the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    /// Convert to the function-calling tool format
    pub fn to_openai_format(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

/// Name-keyed dispatch table of tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<Arc<str>, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: BoxedTool) {
        let name: Arc<str> = Arc::from(tool.name());
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!("Replaced existing tool: {}", name);
        } else {
            debug!("Registered tool: {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&BoxedTool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions of every registered tool, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.input_schema(),
            })
            .collect()
    }

    /// Definitions in the backend's function tool format
    pub fn function_definitions(&self) -> Vec<Value> {
        self.definitions()
            .iter()
            .map(ToolDefinition::to_openai_format)
            .collect()
    }

    /// Run one requested call. Never fails.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolOutput {
        let Some(tool) = self.get(&call.name) else {
            warn!(call_id = %call.id, "Unknown function requested: {}", call.name);
            return ToolOutput::error(&call.id, format!("Unknown function: {}", call.name));
        };

        let arguments: Value = if call.arguments.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(&call.arguments) {
                Ok(value) => value,
                Err(e) => {
                    warn!(call_id = %call.id, "Invalid arguments for {}: {}", call.name, e);
                    return ToolOutput::error(
                        &call.id,
                        format!("Invalid arguments for {}: {}", call.name, e),
                    );
                }
            }
        };

        info!(call_id = %call.id, tool = %call.name, "Executing tool");

        match tool.execute(arguments).await {
            Ok(value) => ToolOutput::new(&call.id, value),
            Err(e) => {
                warn!(call_id = %call.id, tool = %call.name, "Tool failed: {}", e);
                ToolOutput::error(&call.id, e.to_string())
            }
        }
    }
}
