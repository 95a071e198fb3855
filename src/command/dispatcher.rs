//! Action dispatch - runs an ActionPlan against the desktop
//!
//! The set of actions is closed: handlers are registered once, keyed by
//! action name, and anything not in the registry is an unknown action.
//! Every failure (an error from a handler or a panic inside one) stops at
//! this boundary and becomes `false` plus a log entry.

use crate::command::chain::{ChainExecutor, StepRunner};
use crate::core::config::{AgentConfig, ExecutorConfig, LocatorConfig};
use crate::core::error::{AgentError, Result};
use crate::core::types::{ActionKind, ActionPlan};
use crate::desktop::apps::resolve_app;
use crate::desktop::keys::KeyCombo;
use crate::desktop::locator::UiTargetLocator;
use crate::desktop::shortcuts::ShortcutTable;
use crate::platform::Desktop;
use std::any::Any;
use std::collections::HashMap;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::thread;

type Handler = fn(&ActionDispatcher, &ActionPlan, usize) -> Result<()>;

/// Executes plans through a fixed registry of action handlers
pub struct ActionDispatcher {
    desktop: Desktop,
    shortcuts: ShortcutTable,
    locator: LocatorConfig,
    config: ExecutorConfig,
    registry: HashMap<&'static str, Handler>,
}

impl ActionDispatcher {
    pub fn new(desktop: Desktop, config: ExecutorConfig, locator: LocatorConfig) -> Self {
        Self {
            desktop,
            shortcuts: ShortcutTable::new(),
            locator,
            config,
            registry: Self::build_registry(),
        }
    }

    pub fn from_config(desktop: Desktop, config: &AgentConfig) -> Self {
        Self::new(desktop, config.executor.clone(), config.locator.clone())
    }

    fn build_registry() -> HashMap<&'static str, Handler> {
        let mut registry: HashMap<&'static str, Handler> = HashMap::new();
        for kind in ActionKind::PHYSICAL {
            let handler: Handler = match kind {
                ActionKind::OpenApp => Self::open_app,
                ActionKind::Type => Self::type_text,
                ActionKind::PressKey => Self::press_key,
                ActionKind::Click => Self::click,
                ActionKind::CreateFile => Self::create_file,
                ActionKind::Chain => Self::chain,
                _ => Self::fixed_shortcut,
            };
            registry.insert(kind.as_str(), handler);
        }
        registry
    }

    /// Registered action names, sorted
    pub fn supported_actions(&self) -> Vec<&'static str> {
        let mut actions: Vec<_> = self.registry.keys().copied().collect();
        actions.sort_unstable();
        actions
    }

    /// Execute a top-level plan; true on success, false on any handled failure
    pub fn execute(&self, plan: &ActionPlan) -> bool {
        self.dispatch(plan, 0)
    }

    /// Execute a sequence of steps fail-fast, as a `chain` plan would
    pub fn execute_chain(&self, steps: &[ActionPlan]) -> bool {
        ChainExecutor::execute_chain(self, steps, 1)
    }

    fn dispatch(&self, plan: &ActionPlan, depth: usize) -> bool {
        let action = plan.action.trim().to_lowercase();
        let Some(handler) = self.registry.get(action.as_str()) else {
            tracing::warn!("{}", AgentError::UnknownAction(plan.action.clone()));
            return false;
        };

        tracing::info!("Executing {}", plan);
        match panic::catch_unwind(AssertUnwindSafe(|| handler(self, plan, depth))) {
            Ok(Ok(())) => {
                tracing::debug!("Action '{}' succeeded", action);
                true
            }
            Ok(Err(e)) if e.is_expected() => {
                tracing::warn!("Action '{}' failed: {}", action, e);
                false
            }
            Ok(Err(e)) => {
                tracing::error!("Action '{}' faulted: {}", action, e);
                false
            }
            Err(payload) => {
                tracing::error!(
                    "Action '{}' panicked: {}",
                    action,
                    panic_message(payload.as_ref())
                );
                false
            }
        }
    }

    fn press(&self, spec: &str) -> Result<()> {
        let combo = KeyCombo::parse(spec).ok_or_else(|| AgentError::InvalidParameter {
            action: ActionKind::PressKey.as_str().into(),
            reason: format!("'{}' is not a key combination", spec),
        })?;
        self.desktop.input.press_combo(&combo)
    }

    // --- handlers ---

    fn open_app(&self, plan: &ActionPlan, _depth: usize) -> Result<()> {
        let name = plan.require_str("app_name")?;
        if name.trim().is_empty() {
            return Err(AgentError::InvalidParameter {
                action: plan.action.clone(),
                reason: "app_name is empty".into(),
            });
        }

        let target = resolve_app(name);
        self.desktop.launcher.launch(&target)?;
        tracing::info!("Launched {}", target);

        let settle = self.config.settle_delay();
        if !settle.is_zero() {
            thread::sleep(settle);
        }
        Ok(())
    }

    fn type_text(&self, plan: &ActionPlan, _depth: usize) -> Result<()> {
        let text = plan.require_str("text")?;
        if text.is_empty() {
            return Ok(());
        }

        if let Some(clipboard) = &self.desktop.clipboard {
            match clipboard.set_text(text) {
                Ok(()) => return self.press("ctrl+v"),
                Err(e) => tracing::warn!("Clipboard write failed ({}), typing key by key", e),
            }
        }

        for c in text.chars() {
            self.desktop.input.type_char(c)?;
        }
        Ok(())
    }

    fn press_key(&self, plan: &ActionPlan, _depth: usize) -> Result<()> {
        let key = plan.require_str("key")?;
        self.press(key)
    }

    fn click(&self, plan: &ActionPlan, _depth: usize) -> Result<()> {
        let element = plan.require_str("element")?;

        if let Some(combo) = self.shortcuts.lookup(element) {
            tracing::info!("'{}' has a shortcut: {}", element.trim(), combo);
            return self.press(combo);
        }

        let found = UiTargetLocator::new(self.desktop.ui.as_ref(), &self.locator).locate(element);
        let Some(target) = found.element else {
            return Err(AgentError::TargetNotFound(element.to_string()));
        };

        let center = target.rect.center();
        tracing::info!(
            "Clicking '{}' at ({}, {}), confidence {:.2}",
            target.name,
            center.x,
            center.y,
            found.confidence
        );
        self.desktop
            .input
            .move_pointer(center, self.config.pointer_move())?;
        self.desktop.input.click()
    }

    fn create_file(&self, plan: &ActionPlan, _depth: usize) -> Result<()> {
        let path = plan.require_str("path")?;
        if path.trim().is_empty() {
            return Err(AgentError::InvalidParameter {
                action: plan.action.clone(),
                reason: "path is empty".into(),
            });
        }
        let content = plan.str_param("content").unwrap_or_default();

        let path = Path::new(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        tracing::info!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    fn fixed_shortcut(&self, plan: &ActionPlan, _depth: usize) -> Result<()> {
        let combo = plan.kind().fixed_combo().ok_or_else(|| {
            AgentError::Internal(format!("no shortcut registered for '{}'", plan.action))
        })?;
        self.press(combo)
    }

    fn chain(&self, plan: &ActionPlan, depth: usize) -> Result<()> {
        if depth >= self.config.max_chain_depth {
            return Err(AgentError::ChainTooDeep(self.config.max_chain_depth));
        }
        let steps = plan.steps()?;
        ChainExecutor::run(self, &steps, depth + 1)
    }
}

impl StepRunner for ActionDispatcher {
    fn run_step(&self, step: &ActionPlan, depth: usize) -> bool {
        self.dispatch(step, depth)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".into()
    }
}
