//! Research Assistant
//!
//! The entry point a chat front end calls once per user turn. It turns the
//! selected search sources into assistant capabilities, provisions (and
//! caches) one assistant per capability set, flattens the conversation
//! history into the prompt and runs the orchestrator.

use anyhow::Result;
use ra_core::AgentConfig;
use ra_llm::{Assistant, AssistantConfig, Capabilities, OpenAiAssistantsClient, SharedBackend};
use ra_tools::{register_builtin_tools, BingSearchClient, SearchProvider, ToolRegistry, WEB_SEARCH_TOOL};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::orchestrator::{PollSettings, RunOrchestrator};
use crate::session::HistoryEntry;

pub const DEFAULT_ASSISTANT_NAME: &str = "Research Assistant";

pub const RESEARCH_INSTRUCTIONS: &str = "You are a research assistant who searches the web and \
responds to questions based on the documents provided to you.

Always cite your sources when responding to questions. Maintain the conversation context and \
refer to previous exchanges when appropriate. If you don't have enough information to answer a \
question, say so and suggest what additional information might help.

Format your responses in a clear, readable manner using markdown formatting when appropriate.";

pub const NO_SOURCE_MESSAGE: &str = "Please select at least one search source.";

pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "What are the key findings in my vector store documents?",
    "Find the latest research on AI Agents.",
    "Summarize the information about \"TOPIC\" from my documents.",
];

/// Search sources selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSources {
    pub web_search: bool,
    pub file_search: bool,
}

impl Default for SearchSources {
    fn default() -> Self {
        Self {
            web_search: true,
            file_search: true,
        }
    }
}

impl SearchSources {
    pub fn any(&self) -> bool {
        self.web_search || self.file_search
    }
}

/// Flatten prior history and the new question into one prompt
pub fn build_prompt(question: &str, history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return question.to_string();
    }

    let context = history
        .iter()
        .map(|entry| format!("{}: {}", entry.role, entry.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Context of our conversation:\n{}\n\nCurrent question: {}",
        context, question
    )
}

/// Answers questions with a hosted assistant
pub struct ResearchAssistant {
    backend: SharedBackend,
    tools: Arc<ToolRegistry>,
    orchestrator: RunOrchestrator,
    name: String,
    instructions: String,
    model: String,
    vector_store_id: String,
    assistants: Mutex<HashMap<Capabilities, Assistant>>,
}

impl ResearchAssistant {
    pub fn new(config: &AgentConfig, backend: SharedBackend, tools: Arc<ToolRegistry>) -> Self {
        let orchestrator = RunOrchestrator::new(
            backend.clone(),
            tools.clone(),
            PollSettings::from_config(config),
        );

        Self {
            backend,
            tools,
            orchestrator,
            name: DEFAULT_ASSISTANT_NAME.to_string(),
            instructions: RESEARCH_INSTRUCTIONS.to_string(),
            model: config.model.clone(),
            vector_store_id: config.vector_store_id.clone(),
            assistants: Mutex::new(HashMap::new()),
        }
    }

    /// Wire the HTTP backend, the web search provider and the built-in tools
    pub fn from_config(config: &AgentConfig) -> Self {
        let backend: SharedBackend = Arc::new(OpenAiAssistantsClient::with_endpoint(
            config.api_key.clone(),
            config.api_base_url.clone(),
        ));

        let search: Option<Arc<dyn SearchProvider>> = match &config.search_api_key {
            Some(key) if config.enable_web_search => {
                let client = BingSearchClient::with_endpoint(key.clone(), config.search_endpoint.clone());
                Some(Arc::new(client) as Arc<dyn SearchProvider>)
            }
            None if config.enable_web_search => {
                warn!("Web search enabled but BING_SEARCH_API_KEY is not set");
                None
            }
            _ => None,
        };

        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, search);
        info!("Tool registry ready with {} tool(s)", registry.len());

        Self::new(config, backend, Arc::new(registry))
    }

    pub fn web_search_available(&self) -> bool {
        self.tools.contains(WEB_SEARCH_TOOL)
    }

    /// Capabilities for a source selection, limited to what is configured
    pub fn capabilities_for(&self, sources: SearchSources) -> Capabilities {
        Capabilities {
            retrieval: sources.file_search,
            web_search: sources.web_search && self.web_search_available(),
        }
    }

    /// Cached assistant for `capabilities`, provisioned on first use. The
    /// cache lock is not held across the remote call; when two turns race to
    /// provision the same set, the first one stored wins.
    async fn assistant_for(&self, capabilities: Capabilities) -> Result<Assistant> {
        if let Some(assistant) = self.assistants.lock().await.get(&capabilities) {
            return Ok(assistant.clone());
        }

        let config = AssistantConfig {
            name: self.name.clone(),
            instructions: self.instructions.clone(),
            model: self.model.clone(),
            capabilities,
            vector_store_id: self.vector_store_id.clone(),
        };
        let functions = if capabilities.web_search {
            self.tools.function_definitions()
        } else {
            Vec::new()
        };

        let assistant = self.backend.create_assistant(&config, &functions).await?;
        info!(
            assistant_id = %assistant.id,
            retrieval = capabilities.retrieval,
            web_search = capabilities.web_search,
            "Provisioned assistant"
        );
        let mut assistants = self.assistants.lock().await;
        Ok(assistants.entry(capabilities).or_insert(assistant).clone())
    }

    /// Answer `question` given the prior `history`. Always returns text.
    pub async fn get_response(
        &self,
        question: &str,
        history: &[HistoryEntry],
        sources: SearchSources,
    ) -> String {
        let capabilities = self.capabilities_for(sources);
        if capabilities.is_empty() {
            return NO_SOURCE_MESSAGE.to_string();
        }

        let assistant = match self.assistant_for(capabilities).await {
            Ok(assistant) => assistant,
            Err(e) => {
                error!("Failed to provision assistant: {:#}", e);
                return format!("Error: {:#}", e);
            }
        };

        let prompt = build_prompt(question, history);
        self.orchestrator.run(&assistant, &prompt).await
    }
}
