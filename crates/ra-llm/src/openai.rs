//! OpenAI Assistants API Client
//!
//! ## API Endpoints
//!
//! | Endpoint | URL | Purpose |
//! |----------|-----|--------|
//! | Base URL | `https://api.openai.com/v1` | All Assistants APIs |
//! | Assistants | `/assistants` | Provision an assistant |
//! | Threads | `/threads` | Open a conversation thread |
//! | Messages | `/threads/{thread_id}/messages` | Append / list messages |
//! | Runs | `/threads/{thread_id}/runs[/{run_id}]` | Start / poll a run |
//! | Tool outputs | `/threads/{thread_id}/runs/{run_id}/submit_tool_outputs` | Resume a run |
//!
//! ## Authentication
//! - Header: `Authorization: Bearer {OPENAI_API_KEY}`
//! - Header: `OpenAI-Beta: assistants=v2`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::backend::AssistantBackend;
use crate::types::{
    Assistant, AssistantConfig, MessageContent, MessageRole, RunState, RunStatus, ThreadMessage,
    ToolCall, ToolOutput,
};

// =============================================================================
// API ENDPOINT CONFIGURATION
// =============================================================================

pub mod endpoints {
    pub const ASSISTANTS: &str = "/assistants";
    pub const THREADS: &str = "/threads";
    pub const BETA_HEADER: &str = "assistants=v2";
}

// =============================================================================
// DATA STRUCTURES
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateAssistantRequest<'a> {
    name: &'a str,
    instructions: &'a str,
    model: &'a str,
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_resources: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct IdObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    thread_id: String,
    status: RunStatus,
    #[serde(default)]
    required_action: Option<RequiredAction>,
    #[serde(default)]
    last_error: Option<RunError>,
}

#[derive(Debug, Deserialize)]
struct RequiredAction {
    submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Deserialize)]
struct SubmitToolOutputs {
    tool_calls: Vec<RequiredToolCall>,
}

#[derive(Debug, Deserialize)]
struct RequiredToolCall {
    id: String,
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct RunError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    id: String,
    role: MessageRole,
    #[serde(default)]
    content: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct WireToolOutput<'a> {
    tool_call_id: &'a str,
    output: String,
}

impl From<RunObject> for RunState {
    fn from(run: RunObject) -> Self {
        let required_action = run
            .required_action
            .map(|action| {
                action
                    .submit_tool_outputs
                    .tool_calls
                    .into_iter()
                    .map(|call| ToolCall {
                        id: call.id,
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let last_error = run.last_error.map(|e| match (e.code, e.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message,
            (Some(code), None) => code,
            (None, None) => "unknown error".to_string(),
        });

        RunState {
            id: run.id,
            thread_id: run.thread_id,
            status: run.status,
            required_action,
            last_error,
        }
    }
}

/// Convert one raw content block. Text blocks keep their value, anything
/// else is kept by type.
fn parse_content_block(block: &Value) -> MessageContent {
    let kind = block
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    if kind == "text" {
        if let Some(text) = block.pointer("/text/value").and_then(Value::as_str) {
            return MessageContent::Text(text.to_string());
        }
    }

    MessageContent::Other {
        kind: kind.to_string(),
    }
}

/// Build the `tools` list and `tool_resources` for an assistant
fn assistant_tools(config: &AssistantConfig, functions: &[Value]) -> (Vec<Value>, Option<Value>) {
    let mut tools = Vec::new();
    let mut resources = None;

    if config.capabilities.retrieval {
        tools.push(json!({ "type": "file_search" }));
        resources = Some(json!({
            "file_search": { "vector_store_ids": [config.vector_store_id] }
        }));
    }
    if config.capabilities.web_search {
        tools.extend(functions.iter().cloned());
    }

    (tools, resources)
}

// =============================================================================
// CLIENT IMPLEMENTATION
// =============================================================================

/// OpenAI Assistants API client
pub struct OpenAiAssistantsClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl OpenAiAssistantsClient {
    /// Create a client for the API rooted at `endpoint` (e.g. `https://api.openai.com/v1`)
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            api_url: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    fn thread_url(&self, thread_id: &str) -> String {
        format!("{}{}/{}", self.api_url, endpoints::THREADS, thread_id)
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Response> {
        debug!("Assistants POST {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", endpoints::BETA_HEADER)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;
        check_status(response).await
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        debug!("Assistants GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", endpoints::BETA_HEADER)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("Assistants API error {}: {}", status, body));
    }
    Ok(response)
}

async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", what))
}

#[async_trait]
impl AssistantBackend for OpenAiAssistantsClient {
    async fn create_assistant(&self, config: &AssistantConfig, functions: &[Value]) -> Result<Assistant> {
        let url = format!("{}{}", self.api_url, endpoints::ASSISTANTS);
        let (tools, tool_resources) = assistant_tools(config, functions);

        info!(
            "Creating assistant '{}': model={}, tools={}",
            config.name,
            config.model,
            tools.len()
        );

        let request = CreateAssistantRequest {
            name: &config.name,
            instructions: &config.instructions,
            model: &config.model,
            tools,
            tool_resources,
        };

        let created: IdObject = parse(self.post(&url, &request).await?, "assistant").await?;
        Ok(Assistant {
            id: created.id,
            config: config.clone(),
        })
    }

    async fn create_thread(&self) -> Result<String> {
        let url = format!("{}{}", self.api_url, endpoints::THREADS);
        let thread: IdObject = parse(self.post(&url, &json!({})).await?, "thread").await?;
        debug!("Created thread {}", thread.id);
        Ok(thread.id)
    }

    async fn add_message(&self, thread_id: &str, role: &str, content: &str) -> Result<()> {
        let url = format!("{}/messages", self.thread_url(thread_id));
        self.post(&url, &json!({ "role": role, "content": content }))
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunState> {
        let url = format!("{}/runs", self.thread_url(thread_id));
        let run: RunObject = parse(
            self.post(&url, &json!({ "assistant_id": assistant_id })).await?,
            "run",
        )
        .await?;
        Ok(run.into())
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunState> {
        let url = format!("{}/runs/{}", self.thread_url(thread_id), run_id);
        let run: RunObject = parse(self.get(&url, &[]).await?, "run").await?;
        Ok(run.into())
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunState> {
        let url = format!(
            "{}/runs/{}/submit_tool_outputs",
            self.thread_url(thread_id),
            run_id
        );
        let tool_outputs: Vec<WireToolOutput<'_>> = outputs
            .iter()
            .map(|o| WireToolOutput {
                tool_call_id: &o.tool_call_id,
                output: o.output.to_string(),
            })
            .collect();

        info!("Submitting {} tool output(s) to run {}", tool_outputs.len(), run_id);

        let run: RunObject = parse(
            self.post(&url, &json!({ "tool_outputs": tool_outputs })).await?,
            "run",
        )
        .await?;
        Ok(run.into())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let url = format!("{}/messages", self.thread_url(thread_id));
        let list: MessageList = parse(self.get(&url, &[("order", "desc")]).await?, "message list").await?;

        Ok(list
            .data
            .into_iter()
            .map(|m| ThreadMessage {
                id: m.id,
                role: m.role,
                content: m.content.iter().map(parse_content_block).collect(),
            })
            .collect())
    }
}
