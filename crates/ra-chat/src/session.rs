//! Chat session management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::assistant::{ResearchAssistant, SearchSources, NO_SOURCE_MESSAGE};

/// Author of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One exchanged message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A chat session: message history plus the selected search sources
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    messages: Vec<HistoryEntry>,
    sources: SearchSources,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a new chat session with every source selected
    pub fn new() -> Self {
        Self::with_sources(SearchSources::default())
    }

    pub fn with_sources(sources: SearchSources) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            sources,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn messages(&self) -> &[HistoryEntry] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn sources(&self) -> SearchSources {
        self.sources
    }

    /// Flip web search, returning the new state
    pub fn toggle_web_search(&mut self) -> bool {
        self.sources.web_search = !self.sources.web_search;
        self.updated_at = Utc::now();
        self.sources.web_search
    }

    /// Flip vector store search, returning the new state
    pub fn toggle_file_search(&mut self) -> bool {
        self.sources.file_search = !self.sources.file_search;
        self.updated_at = Utc::now();
        self.sources.file_search
    }

    /// Add a message to the session
    pub fn add_message(&mut self, entry: HistoryEntry) {
        self.messages.push(entry);
        self.updated_at = Utc::now();
    }

    /// Clear all messages
    pub fn clear(&mut self) {
        self.messages.clear();
        self.updated_at = Utc::now();
    }

    /// Ask one question. The answer is computed from the prior history,
    /// then both sides of the exchange are recorded. Nothing is recorded
    /// when no search source is selected.
    pub async fn ask(&mut self, assistant: &ResearchAssistant, question: &str) -> String {
        if !self.sources.any() {
            return NO_SOURCE_MESSAGE.to_string();
        }

        let response = assistant
            .get_response(question, &self.messages, self.sources)
            .await;

        self.add_message(HistoryEntry::user(question));
        self.add_message(HistoryEntry::assistant(response.clone()));
        response
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
