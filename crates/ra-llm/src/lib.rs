//! ra-llm: Hosted Assistant Backend Integration
//!
//! ## Supported Backends
//!
//! | Backend | Base URL | Auth Method |
//! |---------|----------|-------------|
//! | OpenAI Assistants v2 | `https://api.openai.com/v1` | `Bearer {OPENAI_API_KEY}` |
//!
//! The [`AssistantBackend`] trait is the seam the run orchestrator drives;
//! tests substitute scripted implementations.

pub mod backend;
pub mod openai;
pub mod types;

pub use backend::{AssistantBackend, SharedBackend};
pub use openai::OpenAiAssistantsClient;
pub use types::{
    Assistant, AssistantConfig, Capabilities, MessageContent, MessageRole, RunState, RunStatus,
    ThreadMessage, ToolCall, ToolOutput,
};
