//! Scripted backend and recording search provider shared by the integration tests

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use ra_llm::{
    Assistant, AssistantBackend, AssistantConfig, RunState, RunStatus, ThreadMessage, ToolCall,
    ToolOutput,
};
use ra_tools::{register_builtin_tools, SearchProvider, SearchResult, SearchResults, ToolRegistry};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Backend whose run walks through a fixed list of statuses.
///
/// Each `retrieve_run` pops the next status; once the script is exhausted the
/// last status repeats. `requires_action` carries `tool_calls`, and
/// submitting outputs moves the run back to `queued`.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<RunStatus>>,
    last: Mutex<RunStatus>,
    pub tool_calls: Vec<ToolCall>,
    pub messages: Vec<ThreadMessage>,
    pub fail_on: Option<&'static str>,
    pub provision_delay: Duration,
    pub prompts: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<Vec<ToolOutput>>>,
    pub created_assistants: Mutex<Vec<(AssistantConfig, Vec<Value>)>>,
    pub retrieve_count: AtomicUsize,
    pub threads_created: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(script: &[RunStatus]) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            last: Mutex::new(RunStatus::Queued),
            tool_calls: Vec::new(),
            messages: vec![
                ThreadMessage::assistant_text("msg_2", "Agents combine memory, planning and tools."),
                ThreadMessage::user_text("msg_1", "What are components for AI agent?"),
            ],
            fail_on: None,
            provision_delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            created_assistants: Mutex::new(Vec::new()),
            retrieve_count: AtomicUsize::new(0),
            threads_created: AtomicUsize::new(0),
        }
    }

    pub fn with_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.tool_calls = calls;
        self
    }

    pub fn with_messages(mut self, messages: Vec<ThreadMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Make `create_assistant` take this long
    pub fn with_provision_delay(mut self, delay: Duration) -> Self {
        self.provision_delay = delay;
        self
    }

    pub fn retrieves(&self) -> usize {
        self.retrieve_count.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Vec<ToolOutput>> {
        self.submitted.lock().unwrap().clone()
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.fail_on == Some(operation) {
            anyhow::bail!("{} failed: connection reset", operation);
        }
        Ok(())
    }

    fn state(&self, status: RunStatus) -> RunState {
        RunState {
            id: "run_1".into(),
            thread_id: "thread_1".into(),
            status,
            required_action: if status == RunStatus::RequiresAction {
                self.tool_calls.clone()
            } else {
                Vec::new()
            },
            last_error: if status == RunStatus::Failed {
                Some("server_error: boom".into())
            } else {
                None
            },
        }
    }
}

#[async_trait]
impl AssistantBackend for ScriptedBackend {
    async fn create_assistant(&self, config: &AssistantConfig, functions: &[Value]) -> Result<Assistant> {
        self.check("create_assistant")?;
        tokio::time::sleep(self.provision_delay).await;
        let mut created = self.created_assistants.lock().unwrap();
        created.push((config.clone(), functions.to_vec()));
        Ok(Assistant {
            id: format!("asst_{}", created.len()),
            config: config.clone(),
        })
    }

    async fn create_thread(&self) -> Result<String> {
        self.check("create_thread")?;
        self.threads_created.fetch_add(1, Ordering::SeqCst);
        Ok("thread_1".into())
    }

    async fn add_message(&self, _thread_id: &str, _role: &str, content: &str) -> Result<()> {
        self.check("add_message")?;
        self.prompts.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<RunState> {
        self.check("create_run")?;
        Ok(self.state(RunStatus::Queued))
    }

    async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> Result<RunState> {
        self.check("retrieve_run")?;
        self.retrieve_count.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(self.state(*last))
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunState> {
        self.check("submit_tool_outputs")?;
        self.submitted.lock().unwrap().push(outputs.to_vec());
        Ok(self.state(RunStatus::Queued))
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.check("list_messages")?;
        Ok(self.messages.clone())
    }
}

/// Search provider that records every call
#[derive(Default)]
pub struct RecordingSearch {
    pub calls: Mutex<Vec<(String, u32)>>,
}

impl RecordingSearch {
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for RecordingSearch {
    async fn search(&self, query: &str, num_results: u32) -> ra_core::Result<SearchResults> {
        self.calls.lock().unwrap().push((query.to_string(), num_results));
        Ok(SearchResults {
            query: query.to_string(),
            results: vec![SearchResult {
                title: "Building effective agents".into(),
                url: "https://example.com/agents".into(),
                snippet: "Agents use tools in a loop.".into(),
            }],
            total_results: 1,
        })
    }
}

pub fn web_search_call(id: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.into(),
        name: "web_search".into(),
        arguments: arguments.into(),
    }
}

pub fn registry_with(search: Arc<RecordingSearch>) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry, Some(search as Arc<dyn SearchProvider>));
    Arc::new(registry)
}

pub fn test_assistant() -> Assistant {
    Assistant {
        id: "asst_test".into(),
        config: AssistantConfig {
            name: "Research Assistant".into(),
            instructions: "Be helpful".into(),
            model: "gpt-4o".into(),
            capabilities: ra_llm::Capabilities::new(true, true),
            vector_store_id: "vs_test".into(),
        },
    }
}
