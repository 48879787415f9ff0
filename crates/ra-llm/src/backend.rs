//! Assistant Backend Trait
//!
//! Interface to a hosted assistant service exposing the
//! assistant/thread/run/message primitives.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::types::{Assistant, AssistantConfig, RunState, ThreadMessage, ToolOutput};

/// Hosted assistant service
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Provision an assistant. `functions` are extra function tool
    /// definitions in the backend's `{"type": "function", ...}` format.
    async fn create_assistant(&self, config: &AssistantConfig, functions: &[Value]) -> Result<Assistant>;

    /// Open a new conversation thread, returning its id
    async fn create_thread(&self) -> Result<String>;

    /// Append a message to a thread
    async fn add_message(&self, thread_id: &str, role: &str, content: &str) -> Result<()>;

    /// Start a run of `assistant_id` over the thread
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunState>;

    /// Fetch the current state of a run
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunState>;

    /// Hand the outputs of requested tool calls back to a run
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunState>;

    /// All messages on a thread, newest first
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}

/// Shared backend for dynamic dispatch
pub type SharedBackend = Arc<dyn AssistantBackend>;
