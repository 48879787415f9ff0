//! Core Tool trait and types
//!
//! Defines the interface for functions the assistant may call mid-run.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A function the assistant can request during a run
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name the backend uses to request this tool (unique)
    fn name(&self) -> &str;

    /// Human-readable description shown to the model
    fn description(&self) -> &str;

    /// JSON schema of the argument object
    fn input_schema(&self) -> Value;

    /// Execute the tool with parsed arguments
    async fn execute(&self, input: Value) -> Result<Value>;
}

/// Type alias for shared tools
pub type BoxedTool = Arc<dyn Tool>;

/// Closure-backed tool, handy for tests and one-off functions
#[derive(Clone)]
pub struct SimpleTool {
    name: String,
    description: String,
    schema: Value,
    handler: Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>,
}

impl SimpleTool {
    pub fn new<F>(name: &str, description: &str, schema: Value, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            schema,
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl Tool for SimpleTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.schema.clone()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        (self.handler)(input)
    }
}
