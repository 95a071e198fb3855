//! Integration tests for command resolution and execution end to end

mod common;

use common::{pipeline, StubTier};
use deskpilot::command::{IntentResolver, OutcomeStatus};
use deskpilot::llm::ReasoningBackend;
use deskpilot::platform::{InputEvent, RecordingDesktop, StaticTree};
use std::sync::atomic::Ordering;

fn resolver(tiers: Vec<StubTier>) -> IntentResolver {
    IntentResolver::with_tiers(
        tiers
            .into_iter()
            .map(|tier| Box::new(tier) as Box<dyn ReasoningBackend>)
            .collect(),
    )
}

/// Local tier answers in a fenced block; the plan runs on the desktop
#[tokio::test]
async fn test_local_tier_fenced_plan_executes() {
    let recording = RecordingDesktop::new();
    let local = StubTier::replying(
        "local",
        "```json\n{\"thought\": \"open then type\", \"action\": \"chain\", \"parameters\": {\"steps\": [\
         {\"action\": \"open_app\", \"parameters\": {\"app_name\": \"notepad\"}},\
         {\"action\": \"type\", \"parameters\": {\"text\": \"hola\"}}]}}\n```",
    );
    let pipeline = pipeline(vec![local], &recording, StaticTree::empty());

    let outcome = pipeline
        .handle("abre el bloc de notas y escribe hola")
        .await
        .unwrap();

    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert!(outcome.executed);
    assert_eq!(outcome.plan.thought.as_deref(), Some("open then type"));

    let events = recording.events();
    assert!(matches!(events[0], InputEvent::Launch(_)));
    assert_eq!(events[1], InputEvent::Clipboard("hola".into()));
    assert_eq!(events[2], InputEvent::Combo("ctrl+v".into()));
}

/// Local garbage falls through to the remote tier within the same turn
#[tokio::test]
async fn test_remote_fallback_after_local_garbage() {
    let local = StubTier::replying("local", "Claro, voy a guardar el archivo.");
    let remote = StubTier::replying("remote", r#"{"action": "save", "parameters": {}}"#);
    let local_calls = local.counter();
    let remote_calls = remote.counter();

    let plan = resolver(vec![local, remote]).resolve("guarda").await;

    assert_eq!(plan.action, "save");
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
}

/// A local failure is not remembered: the next turn asks it again
#[tokio::test]
async fn test_local_failure_is_per_turn() {
    let local = StubTier::replying("local", "not json");
    let remote = StubTier::replying("remote", r#"{"action": "refresh"}"#);
    let local_calls = local.counter();
    let resolver = resolver(vec![local, remote]);

    resolver.resolve("recarga").await;
    resolver.resolve("recarga").await;

    assert_eq!(local_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_total_failure_degrades_to_error_plan() {
    let recording = RecordingDesktop::new();
    let pipeline = pipeline(
        vec![StubTier::offline("local"), StubTier::failing("remote")],
        &recording,
        StaticTree::empty(),
    );

    let outcome = pipeline.handle("haz magia").await.unwrap();

    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert_eq!(outcome.plan.action, "error");
    assert!(outcome.plan.parameters.is_empty());
    assert!(!outcome.executed);
    assert!(recording.events().is_empty());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let resolver = resolver(vec![StubTier::replying(
        "local",
        r#"{"thought": "t", "action": "press_key", "parameters": {"key": "ctrl+z"}}"#,
    )]);

    let first = resolver.resolve("deshaz").await;
    let second = resolver.resolve("deshaz").await;

    assert_eq!(first, second);
}

/// Chain [save, unknown, type]: the type step never runs
#[tokio::test]
async fn test_chain_abort_reported_as_failed() {
    let recording = RecordingDesktop::new().without_clipboard();
    let remote = StubTier::replying(
        "remote",
        r#"{"action": "chain", "parameters": {"steps": [
            {"action": "save"},
            {"action": "levitate"},
            {"action": "type", "parameters": {"text": "never"}}
        ]}}"#,
    );
    let pipeline = pipeline(vec![remote], &recording, StaticTree::empty());

    let outcome = pipeline.handle("guarda, levita y escribe").await.unwrap();

    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert!(!outcome.executed);
    assert_eq!(recording.combos(), vec!["ctrl+s"]);
    assert_eq!(recording.typed_text(), "");
}

#[tokio::test]
async fn test_chat_reply_does_not_touch_desktop() {
    let recording = RecordingDesktop::new();
    let pipeline = pipeline(
        vec![StubTier::replying(
            "local",
            r#"{"action": "chat", "parameters": {"text": "Son las tres."}}"#,
        )],
        &recording,
        StaticTree::empty(),
    );

    let outcome = pipeline.handle("¿qué hora es?").await.unwrap();

    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.response_text.as_deref(), Some("Son las tres."));
    assert!(recording.events().is_empty());
}

/// Backticks inside a string value are text, not a fence
#[tokio::test]
async fn test_backticks_in_text_parameter_resolve() {
    let resolver = resolver(vec![StubTier::replying(
        "local",
        r#"{"action": "type", "parameters": {"text": "usa ``` para bloques"}}"#,
    )]);

    let plan = resolver.resolve("escribe usa tres comillas").await;

    assert_eq!(plan.action, "type");
    assert_eq!(plan.str_param("text"), Some("usa ``` para bloques"));
}
