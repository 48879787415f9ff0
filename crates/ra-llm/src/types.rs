//! Assistant, run and message types shared by backends and the orchestrator

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Search capabilities an assistant is provisioned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Capabilities {
    /// `file_search` over the configured vector store
    pub retrieval: bool,
    /// The `web_search` function
    pub web_search: bool,
}

impl Capabilities {
    pub fn new(retrieval: bool, web_search: bool) -> Self {
        Self { retrieval, web_search }
    }

    pub fn is_empty(&self) -> bool {
        !self.retrieval && !self.web_search
    }
}

/// Configuration an assistant is created from. Immutable once provisioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub capabilities: Capabilities,
    pub vector_store_id: String,
}

/// A provisioned assistant
#[derive(Debug, Clone)]
pub struct Assistant {
    pub id: String,
    pub config: AssistantConfig,
}

/// Run lifecycle status as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// The run has not settled yet and must be polled again
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::RequiresAction | RunStatus::Cancelling
        )
    }

    /// The run ended without producing an answer worth reading
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired | RunStatus::Unknown
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Function call requested by a run in `requires_action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON argument text, parsed by the tool that handles the call
    pub arguments: String,
}

/// Snapshot of a run
#[derive(Debug, Clone)]
pub struct RunState {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    /// Calls the backend is waiting on, empty unless `status` is `RequiresAction`
    pub required_action: Vec<ToolCall>,
    pub last_error: Option<String>,
}

/// Result of one tool call, submitted back to the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: Value,
}

impl ToolOutput {
    pub fn new(tool_call_id: impl Into<String>, output: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output,
        }
    }

    /// Structured error payload for a call that could not be served
    pub fn error(tool_call_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(tool_call_id, serde_json::json!({ "error": message.into() }))
    }

    pub fn is_error(&self) -> bool {
        self.output.get("error").is_some()
    }
}

/// Author of a thread message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One content block of a thread message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    /// Non-text block such as `image_file`, kept by type only
    Other { kind: String },
}

/// Message stored on a thread
#[derive(Debug, Clone)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    pub fn assistant_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Assistant,
            content: vec![MessageContent::Text(text.into())],
        }
    }

    pub fn user_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            content: vec![MessageContent::Text(text.into())],
        }
    }
}
