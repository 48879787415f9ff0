//! Run Orchestrator
//!
//! Drives one conversation turn against the hosted assistant:
//! 1. Opens a thread and posts the prompt
//! 2. Starts a run and polls it on a fixed interval, for a bounded number of polls
//! 3. Serves `requires_action` by dispatching tool calls through the registry
//!    and submitting all outputs in one batch
//! 4. Extracts and cleans the newest assistant message
//!
//! [`RunOrchestrator::run`] never fails: every error is rendered as text.

use anyhow::Result;
use ra_core::AgentConfig;
use ra_llm::{Assistant, RunState, RunStatus, SharedBackend};
use ra_tools::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::formatting::extract_response;

pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try a simpler question.";
pub const FAILURE_MESSAGE: &str =
    "I encountered an error while processing your request. Please try again.";
pub const NO_RESPONSE_MESSAGE: &str = "No response from assistant.";

/// Polling behaviour of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Sleep before each status poll
    pub interval: Duration,
    /// Polls allowed before the run is abandoned
    pub max_iterations: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_iterations: 10,
        }
    }
}

impl PollSettings {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_iterations: config.max_poll_iterations,
        }
    }
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The run completed and produced assistant text
    Completed(String),
    /// The run settled but no assistant message was found
    NoResponse,
    /// The run ended in a failure status
    Failed {
        status: RunStatus,
        reason: Option<String>,
    },
    /// The poll budget ran out while the run was still pending. A run that
    /// settles on the last allowed poll is judged by that status instead.
    TimedOut { last_status: RunStatus },
}

impl RunOutcome {
    /// Text shown to the user for this outcome
    pub fn into_response(self) -> String {
        match self {
            RunOutcome::Completed(text) => text,
            RunOutcome::NoResponse => NO_RESPONSE_MESSAGE.to_string(),
            RunOutcome::Failed { .. } => FAILURE_MESSAGE.to_string(),
            RunOutcome::TimedOut { .. } => TIMEOUT_MESSAGE.to_string(),
        }
    }
}

/// Orchestrates a single assistant run per call
pub struct RunOrchestrator {
    backend: SharedBackend,
    tools: Arc<ToolRegistry>,
    settings: PollSettings,
}

impl RunOrchestrator {
    pub fn new(backend: SharedBackend, tools: Arc<ToolRegistry>, settings: PollSettings) -> Self {
        Self {
            backend,
            tools,
            settings,
        }
    }

    /// Run one turn and return the text to show. Errors become `"Error: ..."`.
    pub async fn run(&self, assistant: &Assistant, prompt: &str) -> String {
        match self.execute(assistant, prompt).await {
            Ok(outcome) => outcome.into_response(),
            Err(e) => {
                error!("Assistant run failed: {:#}", e);
                format!("Error: {:#}", e)
            }
        }
    }

    /// Run one turn, surfacing backend errors to the caller
    pub async fn execute(&self, assistant: &Assistant, prompt: &str) -> Result<RunOutcome> {
        let thread_id = self.backend.create_thread().await?;
        self.backend.add_message(&thread_id, "user", prompt).await?;

        let mut run = self.backend.create_run(&thread_id, &assistant.id).await?;
        info!(
            thread_id = %thread_id,
            run_id = %run.id,
            assistant_id = %assistant.id,
            "Started run"
        );

        let mut iterations = 0;
        while run.status.is_pending() && iterations < self.settings.max_iterations {
            tokio::time::sleep(self.settings.interval).await;
            run = self.backend.retrieve_run(&thread_id, &run.id).await?;
            iterations += 1;
            debug!(run_id = %run.id, iteration = iterations, status = %run.status, "Polled run");

            if run.status == RunStatus::RequiresAction {
                run = self.resolve_tool_calls(&thread_id, run).await?;
            }
        }

        if run.status.is_pending() {
            warn!(
                run_id = %run.id,
                status = %run.status,
                "Run still pending after {} polls",
                iterations
            );
            return Ok(RunOutcome::TimedOut {
                last_status: run.status,
            });
        }

        if run.status.is_failure() {
            warn!(
                run_id = %run.id,
                status = %run.status,
                "Run ended without an answer: {}",
                run.last_error.as_deref().unwrap_or("no error reported")
            );
            return Ok(RunOutcome::Failed {
                status: run.status,
                reason: run.last_error,
            });
        }

        let messages = self.backend.list_messages(&thread_id).await?;
        info!(run_id = %run.id, status = %run.status, "Run finished after {} polls", iterations);

        Ok(match extract_response(&messages) {
            Some(text) => RunOutcome::Completed(text),
            None => RunOutcome::NoResponse,
        })
    }

    /// Dispatch every requested call and submit the outputs together.
    async fn resolve_tool_calls(&self, thread_id: &str, run: RunState) -> Result<RunState> {
        let mut outputs = Vec::with_capacity(run.required_action.len());
        for call in &run.required_action {
            outputs.push(self.tools.dispatch(call).await);
        }

        if outputs.is_empty() {
            warn!(run_id = %run.id, "Run requires action but requested no tool calls");
            return Ok(run);
        }

        let failed = outputs.iter().filter(|o| o.is_error()).count();
        info!(
            run_id = %run.id,
            "Submitting {} tool output(s), {} with errors",
            outputs.len(),
            failed
        );

        self.backend
            .submit_tool_outputs(thread_id, &run.id, &outputs)
            .await
    }
}
