//! Intent resolution - converts a natural-language command into an ActionPlan
//!
//! Tiers are tried in order (local model first, hosted model second). A tier
//! is asked at most once per command; the first one that yields a valid plan
//! wins. When every tier fails the result is the `error` plan, never a panic
//! and never an `Err`.

use crate::core::config::ReasoningConfig;
use crate::core::types::ActionPlan;
use crate::llm::backend::ReasoningBackend;
use crate::llm::client::LlmClient;
use crate::llm::local::OllamaClient;
use crate::llm::parser::parse_plan;
use crate::llm::prompt::{user_message, ACTION_GRAMMAR};
use serde::Serialize;

/// Availability of one reasoning tier
#[derive(Debug, Clone, Serialize)]
pub struct TierStatus {
    pub name: String,
    pub available: bool,
}

/// Resolves commands through an ordered list of reasoning tiers
pub struct IntentResolver {
    tiers: Vec<Box<dyn ReasoningBackend>>,
}

impl IntentResolver {
    /// Local tier (when enabled) followed by the remote tier
    pub fn from_config(config: &ReasoningConfig) -> Self {
        let mut tiers: Vec<Box<dyn ReasoningBackend>> = Vec::new();
        if config.local.enabled {
            tiers.push(Box::new(OllamaClient::from_config(&config.local)));
        }
        tiers.push(Box::new(LlmClient::from_config(&config.remote)));
        Self::with_tiers(tiers)
    }

    pub fn with_tiers(tiers: Vec<Box<dyn ReasoningBackend>>) -> Self {
        Self { tiers }
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Resolve a command to a plan
    pub async fn resolve(&self, utterance: &str) -> ActionPlan {
        tracing::info!("Resolving intent: '{}'", utterance);
        let user = user_message(utterance);

        for tier in &self.tiers {
            if !tier.is_available().await {
                tracing::debug!("Tier '{}' unavailable, skipping", tier.name());
                continue;
            }

            let raw = match tier.complete(ACTION_GRAMMAR, &user).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Tier '{}' failed: {}", tier.name(), e);
                    continue;
                }
            };

            match parse_plan(&raw) {
                Ok(plan) => {
                    tracing::info!("Plan from '{}': {}", tier.name(), plan);
                    return plan;
                }
                Err(e) => {
                    tracing::warn!("Tier '{}' returned an invalid plan: {}", tier.name(), e);
                }
            }
        }

        tracing::error!("All reasoning tiers failed for '{}'", utterance);
        ActionPlan::error()
    }

    /// Probe every tier
    pub async fn tier_status(&self) -> Vec<TierStatus> {
        let mut status = Vec::with_capacity(self.tiers.len());
        for tier in &self.tiers {
            status.push(TierStatus {
                name: tier.name().to_string(),
                available: tier.is_available().await,
            });
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{AgentError, Result};
    use crate::core::types::ActionKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        name: &'static str,
        available: bool,
        reply: std::result::Result<&'static str, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn boxed(
            name: &'static str,
            available: bool,
            reply: std::result::Result<&'static str, &'static str>,
        ) -> (Box<dyn ReasoningBackend>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let tier = Scripted {
                name,
                available,
                reply,
                calls: calls.clone(),
            };
            (Box::new(tier), calls)
        }
    }

    #[async_trait]
    impl ReasoningBackend for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .map_err(|e| AgentError::Reasoning(e.into()))
        }
    }

    #[tokio::test]
    async fn test_first_valid_tier_wins() {
        let (local, local_calls) = Scripted::boxed("local", true, Ok(r#"{"action": "save"}"#));
        let (remote, remote_calls) =
            Scripted::boxed("remote", true, Ok(r#"{"action": "refresh"}"#));
        let resolver = IntentResolver::with_tiers(vec![local, remote]);

        let plan = resolver.resolve("guarda").await;
        assert_eq!(plan.kind(), ActionKind::Save);
        assert_eq!(local_calls.load(Ordering::SeqCst), 1);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unavailable_tier_is_not_called() {
        let (local, local_calls) = Scripted::boxed("local", false, Ok(r#"{"action": "save"}"#));
        let (remote, _) = Scripted::boxed("remote", true, Ok(r#"{"action": "minimize"}"#));
        let resolver = IntentResolver::with_tiers(vec![local, remote]);

        assert_eq!(resolver.resolve("minimiza").await.action, "minimize");
        assert_eq!(local_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_output_falls_through() {
        let (local, local_calls) = Scripted::boxed("local", true, Ok("no idea, sorry"));
        let (remote, _) = Scripted::boxed("remote", true, Ok(r#"{"action": "maximize"}"#));
        let resolver = IntentResolver::with_tiers(vec![local, remote]);

        assert_eq!(resolver.resolve("maximiza").await.action, "maximize");
        assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_total_failure_yields_error_plan() {
        let (local, local_calls) = Scripted::boxed("local", true, Err("connection refused"));
        let (remote, remote_calls) = Scripted::boxed("remote", true, Err("HTTP 503"));
        let resolver = IntentResolver::with_tiers(vec![local, remote]);

        let plan = resolver.resolve("haz algo").await;
        assert!(plan.is_error());
        assert!(plan.parameters.is_empty());
        assert_eq!(local_calls.load(Ordering::SeqCst), 1);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_tiers_yields_error_plan() {
        let resolver = IntentResolver::with_tiers(Vec::new());
        assert!(resolver.resolve("hola").await.is_error());
    }

    #[tokio::test]
    async fn test_tier_status_reports_each_tier() {
        let (local, _) = Scripted::boxed("local", false, Err("down"));
        let (remote, _) = Scripted::boxed("remote", true, Err("down"));
        let resolver = IntentResolver::with_tiers(vec![local, remote]);

        let status = resolver.tier_status().await;
        assert_eq!(status.len(), 2);
        assert_eq!(status[0].name, "local");
        assert!(!status[0].available);
        assert!(status[1].available);
    }

    #[test]
    fn test_from_config_skips_disabled_local() {
        let mut config = ReasoningConfig::default();
        assert_eq!(IntentResolver::from_config(&config).tier_count(), 2);
        config.local.enabled = false;
        assert_eq!(IntentResolver::from_config(&config).tier_count(), 1);
    }
}
