//! One command, end to end: resolve, route, execute, report

use crate::command::dispatcher::ActionDispatcher;
use crate::command::resolver::IntentResolver;
use crate::core::error::{AgentError, Result};
use crate::core::types::{ActionKind, ActionPlan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Overall result of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The plan ran (or was a conversational reply)
    Success,
    /// The plan was understood but a handler reported failure
    Failed,
    /// No usable plan was produced
    Error,
}

/// What the caller gets back for a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub status: OutcomeStatus,
    pub plan: ActionPlan,
    pub executed: bool,
    /// Reply for `chat`, question for `clarify`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandOutcome {
    fn error(plan: ActionPlan, message: &str) -> Self {
        Self {
            status: OutcomeStatus::Error,
            plan,
            executed: false,
            response_text: None,
            message: Some(message.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Resolver and dispatcher wired together
pub struct CommandPipeline {
    resolver: IntentResolver,
    dispatcher: Arc<ActionDispatcher>,
}

impl CommandPipeline {
    pub fn new(resolver: IntentResolver, dispatcher: ActionDispatcher) -> Self {
        Self {
            resolver,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Resolve without executing
    pub async fn think(&self, command: &str) -> ActionPlan {
        if command.trim().is_empty() {
            return ActionPlan::error();
        }
        self.resolver.resolve(command).await
    }

    /// Resolve and execute a command
    ///
    /// Failed plans are an `Ok` outcome; `Err` is reserved for internal faults.
    pub async fn handle(&self, command: &str) -> Result<CommandOutcome> {
        if command.trim().is_empty() {
            return Ok(CommandOutcome::error(ActionPlan::error(), "empty command"));
        }
        let plan = self.resolver.resolve(command).await;
        self.run_plan(plan).await
    }

    /// Route an already-resolved plan
    pub async fn run_plan(&self, plan: ActionPlan) -> Result<CommandOutcome> {
        match plan.kind() {
            ActionKind::Error => Ok(CommandOutcome::error(plan, "could not understand command")),
            ActionKind::Chat | ActionKind::Clarify => {
                let response_text = plan
                    .str_param("text")
                    .or_else(|| plan.str_param("question"))
                    .map(str::to_string);
                tracing::info!("Reply: {}", response_text.as_deref().unwrap_or(""));
                Ok(CommandOutcome {
                    status: OutcomeStatus::Success,
                    plan,
                    executed: true,
                    response_text,
                    message: None,
                })
            }
            _ => {
                // Physical actions block; keep them off the async workers.
                let dispatcher = self.dispatcher.clone();
                let step = plan.clone();
                let executed = tokio::task::spawn_blocking(move || dispatcher.execute(&step))
                    .await
                    .map_err(|e| AgentError::Internal(format!("dispatch task failed: {}", e)))?;

                Ok(CommandOutcome {
                    status: if executed {
                        OutcomeStatus::Success
                    } else {
                        OutcomeStatus::Failed
                    },
                    plan,
                    executed,
                    response_text: None,
                    message: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ExecutorConfig, LocatorConfig};
    use crate::llm::backend::ReasoningBackend;
    use crate::platform::{NoUiTree, RecordingDesktop};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        reply: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ReasoningBackend for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    fn pipeline(reply: &'static str) -> (CommandPipeline, RecordingDesktop, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = IntentResolver::with_tiers(vec![Box::new(Fixed {
            reply,
            calls: calls.clone(),
        })]);
        let recording = RecordingDesktop::new();
        let config = ExecutorConfig {
            settle_delay_ms: 0,
            ..ExecutorConfig::default()
        };
        let dispatcher = ActionDispatcher::new(
            recording.clone().into_desktop(Box::new(NoUiTree)),
            config,
            LocatorConfig::default(),
        );
        (CommandPipeline::new(resolver, dispatcher), recording, calls)
    }

    #[tokio::test]
    async fn test_physical_action_success() {
        let (pipeline, recording, _) = pipeline(r#"{"action": "save"}"#);
        let outcome = pipeline.handle("guarda").await.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert!(outcome.executed);
        assert_eq!(recording.combos(), vec!["ctrl+s"]);
    }

    #[tokio::test]
    async fn test_failed_action_is_not_an_error() {
        let (pipeline, _, _) = pipeline(r#"{"action": "levitate"}"#);
        let outcome = pipeline.handle("levita").await.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert!(!outcome.executed);
        assert_eq!(outcome.plan.action, "levitate");
    }

    #[tokio::test]
    async fn test_chat_is_not_dispatched() {
        let (pipeline, recording, _) =
            pipeline(r#"{"action": "chat", "parameters": {"text": "¡Hola!"}}"#);
        let outcome = pipeline.handle("hola").await.unwrap();
        assert!(outcome.is_success());
        assert!(outcome.executed);
        assert_eq!(outcome.response_text.as_deref(), Some("¡Hola!"));
        assert!(recording.events().is_empty());
    }

    #[tokio::test]
    async fn test_clarify_returns_question() {
        let (pipeline, _, _) = pipeline(
            r#"{"action": "clarify", "parameters": {"question": "¿Qué archivo?"}}"#,
        );
        let outcome = pipeline.handle("abre el archivo").await.unwrap();
        assert_eq!(outcome.response_text.as_deref(), Some("¿Qué archivo?"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_error_outcome() {
        let (pipeline, _, _) = pipeline("lo siento, no entiendo");
        let outcome = pipeline.handle("xyz").await.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert!(outcome.plan.is_error());
        assert_eq!(outcome.message.as_deref(), Some("could not understand command"));
    }

    #[tokio::test]
    async fn test_empty_command_skips_reasoning() {
        let (pipeline, _, calls) = pipeline(r#"{"action": "save"}"#);
        let outcome = pipeline.handle("   ").await.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(pipeline.think("").await.is_error());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = CommandOutcome {
            status: OutcomeStatus::Failed,
            plan: ActionPlan::new("click").with_param("element", "Ok"),
            executed: false,
            response_text: None,
            message: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["executed"], false);
        assert!(json.get("response_text").is_none());
        assert_eq!(json["plan"]["parameters"]["element"], "Ok");
    }
}
