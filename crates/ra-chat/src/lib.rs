//! ra-chat: Conversation layer of the research assistant
//!
//! This crate drives assistant runs to completion and exposes the
//! `get_response` entry point a chat front end calls once per turn.

pub mod assistant;
pub mod formatting;
pub mod orchestrator;
pub mod session;

// Re-export main types
pub use assistant::{
    build_prompt, ResearchAssistant, SearchSources, EXAMPLE_QUESTIONS, NO_SOURCE_MESSAGE,
};
pub use formatting::{clean_text, extract_response};
pub use orchestrator::{
    PollSettings, RunOrchestrator, RunOutcome, FAILURE_MESSAGE, NO_RESPONSE_MESSAGE,
    TIMEOUT_MESSAGE,
};
pub use session::{ChatSession, HistoryEntry, Role};
