//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use deskpilot::command::{ActionDispatcher, CommandPipeline, IntentResolver};
use deskpilot::core::config::{ExecutorConfig, LocatorConfig};
use deskpilot::core::error::{AgentError, Result};
use deskpilot::llm::ReasoningBackend;
use deskpilot::platform::{RecordingDesktop, StaticTree};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Reasoning tier with a canned reply and a call counter
pub struct StubTier {
    pub name: &'static str,
    pub available: bool,
    pub reply: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl StubTier {
    pub fn replying(name: &'static str, reply: &str) -> Self {
        Self {
            name,
            available: true,
            reply: Some(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            available: true,
            reply: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn offline(name: &'static str) -> Self {
        Self {
            available: false,
            ..Self::failing(name)
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl ReasoningBackend for StubTier {
    fn name(&self) -> &str {
        self.name
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AgentError::Reasoning("connection refused".into()))
    }
}

pub fn instant_executor() -> ExecutorConfig {
    ExecutorConfig {
        settle_delay_ms: 0,
        pointer_move_ms: 0,
        ..ExecutorConfig::default()
    }
}

pub fn dispatcher(recording: &RecordingDesktop, tree: StaticTree) -> ActionDispatcher {
    ActionDispatcher::new(
        recording.clone().into_desktop(Box::new(tree)),
        instant_executor(),
        LocatorConfig::default(),
    )
}

pub fn pipeline(
    tiers: Vec<StubTier>,
    recording: &RecordingDesktop,
    tree: StaticTree,
) -> CommandPipeline {
    let tiers: Vec<Box<dyn ReasoningBackend>> = tiers
        .into_iter()
        .map(|tier| Box::new(tier) as Box<dyn ReasoningBackend>)
        .collect();
    CommandPipeline::new(
        IntentResolver::with_tiers(tiers),
        dispatcher(recording, tree),
    )
}
