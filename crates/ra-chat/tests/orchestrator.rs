//! Run orchestration against a scripted backend

mod common;

use common::{registry_with, test_assistant, web_search_call, RecordingSearch, ScriptedBackend};
use ra_chat::{
    PollSettings, RunOrchestrator, RunOutcome, FAILURE_MESSAGE, NO_RESPONSE_MESSAGE,
    TIMEOUT_MESSAGE,
};
use ra_llm::{RunStatus, ThreadMessage, ToolCall};
use ra_tools::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;

fn fast() -> PollSettings {
    PollSettings {
        interval: Duration::ZERO,
        max_iterations: 10,
    }
}

fn orchestrator(backend: Arc<ScriptedBackend>, search: Arc<RecordingSearch>) -> RunOrchestrator {
    RunOrchestrator::new(backend, registry_with(search), fast())
}

#[tokio::test]
async fn test_web_search_call_is_served_then_completes() {
    let backend = Arc::new(
        ScriptedBackend::new(&[
            RunStatus::InProgress,
            RunStatus::RequiresAction,
            RunStatus::Completed,
        ])
        .with_tool_calls(vec![web_search_call("call_1", r#"{"query":"x","num_results":3}"#)]),
    );
    let search = Arc::new(RecordingSearch::default());

    let response = orchestrator(backend.clone(), search.clone())
        .run(&test_assistant(), "What are components for AI agent?")
        .await;

    assert_eq!(response, "Agents combine memory, planning and tools.");
    assert_eq!(search.calls(), vec![("x".to_string(), 3)]);

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].len(), 1);
    assert_eq!(submissions[0][0].tool_call_id, "call_1");
    assert!(!submissions[0][0].is_error());
    assert_eq!(submissions[0][0].output["results"][0]["url"], "https://example.com/agents");

    assert_eq!(
        *backend.prompts.lock().unwrap(),
        vec!["What are components for AI agent?".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stuck_run_times_out_after_ten_polls() {
    let backend = Arc::new(ScriptedBackend::new(&[RunStatus::InProgress, RunStatus::Queued]));
    let search = Arc::new(RecordingSearch::default());
    let orchestrator =
        RunOrchestrator::new(backend.clone(), registry_with(search.clone()), PollSettings::default());

    let started = tokio::time::Instant::now();
    let response = orchestrator.run(&test_assistant(), "hello").await;

    assert_eq!(response, TIMEOUT_MESSAGE);
    assert_eq!(backend.retrieves(), 10);
    assert!(search.calls().is_empty());
    assert!(started.elapsed() >= Duration::from_secs(10));
}

#[tokio::test]
async fn test_search_calls_bounded_by_requires_action_transitions() {
    let backend = Arc::new(
        ScriptedBackend::new(&[
            RunStatus::RequiresAction,
            RunStatus::InProgress,
            RunStatus::RequiresAction,
            RunStatus::Queued,
        ])
        .with_tool_calls(vec![web_search_call("call_1", r#"{"query":"agents"}"#)]),
    );
    let search = Arc::new(RecordingSearch::default());

    let response = orchestrator(backend.clone(), search.clone())
        .run(&test_assistant(), "hello")
        .await;

    assert_eq!(response, TIMEOUT_MESSAGE);
    assert_eq!(backend.retrieves(), 10);
    assert_eq!(search.calls().len(), 2);
    assert_eq!(search.calls()[0], ("agents".to_string(), 5));
    assert_eq!(backend.submissions().len(), 2);
}

#[tokio::test]
async fn test_failed_run_returns_failure_message_after_submission() {
    let backend = Arc::new(
        ScriptedBackend::new(&[RunStatus::RequiresAction, RunStatus::Failed])
            .with_tool_calls(vec![web_search_call("call_1", r#"{"query":"x"}"#)]),
    );
    let search = Arc::new(RecordingSearch::default());

    let outcome = orchestrator(backend.clone(), search)
        .execute(&test_assistant(), "hello")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Failed {
            status: RunStatus::Failed,
            reason: Some("server_error: boom".into())
        }
    );
    assert_eq!(outcome.into_response(), FAILURE_MESSAGE);
    assert_eq!(backend.submissions().len(), 1);
}

#[tokio::test]
async fn test_failed_on_first_poll() {
    let backend = Arc::new(ScriptedBackend::new(&[RunStatus::Failed]));
    let response = orchestrator(backend.clone(), Arc::new(RecordingSearch::default()))
        .run(&test_assistant(), "hello")
        .await;

    assert_eq!(response, FAILURE_MESSAGE);
    assert_eq!(backend.retrieves(), 1);
}

#[tokio::test]
async fn test_malformed_arguments_become_error_output() {
    let backend = Arc::new(
        ScriptedBackend::new(&[RunStatus::RequiresAction, RunStatus::Completed])
            .with_tool_calls(vec![web_search_call("call_bad", "{\"query\": ")]),
    );
    let search = Arc::new(RecordingSearch::default());

    let response = orchestrator(backend.clone(), search.clone())
        .run(&test_assistant(), "hello")
        .await;

    assert_eq!(response, "Agents combine memory, planning and tools.");
    assert!(search.calls().is_empty());

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0][0].tool_call_id, "call_bad");
    assert!(submissions[0][0].is_error());
}

#[tokio::test]
async fn test_unknown_function_gets_explicit_error_output() {
    let backend = Arc::new(
        ScriptedBackend::new(&[RunStatus::RequiresAction, RunStatus::Completed]).with_tool_calls(vec![
            ToolCall {
                id: "call_1".into(),
                name: "get_weather".into(),
                arguments: "{}".into(),
            },
            web_search_call("call_2", r#"{"query":"rust"}"#),
        ]),
    );
    let search = Arc::new(RecordingSearch::default());

    orchestrator(backend.clone(), search.clone())
        .run(&test_assistant(), "hello")
        .await;

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    let outputs = &submissions[0];
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].tool_call_id, "call_1");
    assert_eq!(outputs[0].output["error"], "Unknown function: get_weather");
    assert_eq!(outputs[1].tool_call_id, "call_2");
    assert!(!outputs[1].is_error());
    assert_eq!(search.calls().len(), 1);
}

#[tokio::test]
async fn test_requires_action_without_tools_registered() {
    let backend = Arc::new(
        ScriptedBackend::new(&[RunStatus::RequiresAction, RunStatus::Completed])
            .with_tool_calls(vec![web_search_call("call_1", r#"{"query":"x"}"#)]),
    );
    let orchestrator = RunOrchestrator::new(backend.clone(), Arc::new(ToolRegistry::new()), fast());

    let response = orchestrator.run(&test_assistant(), "hello").await;

    assert_eq!(response, "Agents combine memory, planning and tools.");
    assert_eq!(
        backend.submissions()[0][0].output["error"],
        "Unknown function: web_search"
    );
}

#[tokio::test]
async fn test_no_assistant_message() {
    let backend = Arc::new(
        ScriptedBackend::new(&[RunStatus::Completed])
            .with_messages(vec![ThreadMessage::user_text("msg_1", "hello")]),
    );
    let response = orchestrator(backend, Arc::new(RecordingSearch::default()))
        .run(&test_assistant(), "hello")
        .await;

    assert_eq!(response, NO_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn test_response_is_cleaned() {
    let backend = Arc::new(ScriptedBackend::new(&[RunStatus::Completed]).with_messages(vec![
        ThreadMessage::assistant_text(
            "msg_2",
            "Key parts:   - memory\n\n\n\n- tools. Each one matters.",
        ),
    ]));
    let response = orchestrator(backend, Arc::new(RecordingSearch::default()))
        .run(&test_assistant(), "hello")
        .await;

    assert_eq!(response, "Key parts:\n- memory\n- tools.\n\nEach one matters.");
}

#[tokio::test]
async fn test_backend_errors_are_rendered_not_raised() {
    for operation in [
        "create_thread",
        "add_message",
        "create_run",
        "retrieve_run",
        "list_messages",
    ] {
        let backend = Arc::new(ScriptedBackend::new(&[RunStatus::Completed]).failing_on(operation));
        let response = orchestrator(backend, Arc::new(RecordingSearch::default()))
            .run(&test_assistant(), "hello")
            .await;

        assert_eq!(
            response,
            format!("Error: {} failed: connection reset", operation),
            "unexpected response when {} fails",
            operation
        );
    }
}

#[tokio::test]
async fn test_submit_error_is_rendered() {
    let backend = Arc::new(
        ScriptedBackend::new(&[RunStatus::RequiresAction])
            .with_tool_calls(vec![web_search_call("call_1", r#"{"query":"x"}"#)])
            .failing_on("submit_tool_outputs"),
    );
    let response = orchestrator(backend, Arc::new(RecordingSearch::default()))
        .run(&test_assistant(), "hello")
        .await;

    assert!(response.starts_with("Error: submit_tool_outputs failed"));
}

#[tokio::test]
async fn test_completion_on_last_allowed_poll_is_not_a_timeout() {
    let mut script = vec![RunStatus::InProgress; 9];
    script.push(RunStatus::Completed);
    let backend = Arc::new(ScriptedBackend::new(&script));

    let response = orchestrator(backend.clone(), Arc::new(RecordingSearch::default()))
        .run(&test_assistant(), "hello")
        .await;

    assert_eq!(backend.retrieves(), 10);
    assert_eq!(response, "Agents combine memory, planning and tools.");
}
