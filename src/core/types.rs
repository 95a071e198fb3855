//! Core type definitions used throughout the codebase

use crate::core::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Structured directive produced by reasoning and consumed by execution
///
/// Created once per user turn and discarded after it has been dispatched.
/// A `chain` plan carries its sub-plans as raw JSON under `parameters.steps`;
/// they are decoded only when the chain runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Reasoning summary from the backend, diagnostic only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    /// Lower-case action identifier
    pub action: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl ActionPlan {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            thought: None,
            action: action.into(),
            parameters: Map::new(),
        }
    }

    /// The terminal "could not understand" plan
    pub fn error() -> Self {
        Self::new(ActionKind::Error.as_str())
    }

    /// Builder-style parameter insertion
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = Some(thought.into());
        self
    }

    /// A `chain` plan over the given steps
    pub fn chain(steps: Vec<ActionPlan>) -> Self {
        let steps: Vec<Value> = steps
            .into_iter()
            .map(|step| serde_json::to_value(step).unwrap_or(Value::Null))
            .collect();
        Self::new(ActionKind::Chain.as_str()).with_param("steps", Value::Array(steps))
    }

    pub fn kind(&self) -> ActionKind {
        ActionKind::from_name(&self.action)
    }

    pub fn is_error(&self) -> bool {
        self.kind() == ActionKind::Error
    }

    /// String parameter, if present and a string
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }

    /// String parameter that must be present
    pub fn require_str(&self, key: &'static str) -> Result<&str> {
        self.str_param(key).ok_or_else(|| AgentError::MissingParameter {
            action: self.action.clone(),
            name: key,
        })
    }

    /// Decode `parameters.steps` of a chain plan
    pub fn steps(&self) -> Result<Vec<ActionPlan>> {
        let raw = self
            .parameters
            .get("steps")
            .ok_or_else(|| AgentError::MissingParameter {
                action: self.action.clone(),
                name: "steps",
            })?;

        let items = raw.as_array().ok_or_else(|| AgentError::InvalidParameter {
            action: self.action.clone(),
            reason: "steps must be a list".into(),
        })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                ActionPlan::from_value(item.clone()).map_err(|reason| {
                    AgentError::InvalidParameter {
                        action: self.action.clone(),
                        reason: format!("step {}: {}", i, reason),
                    }
                })
            })
            .collect()
    }

    /// Validate and repair a plan-shaped JSON value
    ///
    /// `action` must be a non-empty string and is normalized. Missing or null
    /// `parameters` become empty, any other non-object is rejected. A
    /// non-string `thought` is dropped.
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        let Value::Object(mut object) = value else {
            return Err("Plan is not a JSON object".into());
        };

        let action = match object.remove("action") {
            Some(Value::String(action)) if !action.trim().is_empty() => action.trim().to_lowercase(),
            Some(Value::String(_)) => return Err("Plan has an empty action".into()),
            Some(_) => return Err("Plan action is not a string".into()),
            None => return Err("Plan has no action".into()),
        };

        let parameters = match object.remove("parameters") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(parameters)) => parameters,
            Some(_) => return Err(format!("Parameters of '{}' are not an object", action)),
        };

        let thought = match object.remove("thought") {
            Some(Value::String(thought)) => Some(thought),
            _ => None,
        };

        Ok(Self {
            thought,
            action,
            parameters,
        })
    }

    /// Trimmed, lower-case action identifier
    pub fn normalized(mut self) -> Self {
        self.action = self.action.trim().to_lowercase();
        self
    }
}

impl fmt::Display for ActionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        if !self.parameters.is_empty() {
            write!(f, " {}", Value::Object(self.parameters.clone()))?;
        }
        Ok(())
    }
}

/// The closed action vocabulary understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    OpenApp,
    Type,
    PressKey,
    Click,
    CreateFile,
    Save,
    Minimize,
    Maximize,
    CloseWindow,
    Refresh,
    Screenshot,
    SwitchApp,
    Chain,
    /// Conversational reply, never executed physically
    Chat,
    /// Ambiguity signal, never executed physically
    Clarify,
    /// Backend admitted it did not understand
    Unknown,
    /// Both reasoning tiers failed
    Error,
    /// Anything outside the vocabulary
    Unrecognized,
}

impl ActionKind {
    pub const PHYSICAL: [ActionKind; 13] = [
        ActionKind::OpenApp,
        ActionKind::Type,
        ActionKind::PressKey,
        ActionKind::Click,
        ActionKind::CreateFile,
        ActionKind::Save,
        ActionKind::Minimize,
        ActionKind::Maximize,
        ActionKind::CloseWindow,
        ActionKind::Refresh,
        ActionKind::Screenshot,
        ActionKind::SwitchApp,
        ActionKind::Chain,
    ];

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "open_app" => ActionKind::OpenApp,
            "type" => ActionKind::Type,
            "press_key" => ActionKind::PressKey,
            "click" => ActionKind::Click,
            "create_file" => ActionKind::CreateFile,
            "save" => ActionKind::Save,
            "minimize" => ActionKind::Minimize,
            "maximize" => ActionKind::Maximize,
            "close_window" => ActionKind::CloseWindow,
            "refresh" => ActionKind::Refresh,
            "screenshot" => ActionKind::Screenshot,
            "switch_app" => ActionKind::SwitchApp,
            "chain" => ActionKind::Chain,
            "chat" => ActionKind::Chat,
            "clarify" => ActionKind::Clarify,
            "unknown" => ActionKind::Unknown,
            "error" => ActionKind::Error,
            _ => ActionKind::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::OpenApp => "open_app",
            ActionKind::Type => "type",
            ActionKind::PressKey => "press_key",
            ActionKind::Click => "click",
            ActionKind::CreateFile => "create_file",
            ActionKind::Save => "save",
            ActionKind::Minimize => "minimize",
            ActionKind::Maximize => "maximize",
            ActionKind::CloseWindow => "close_window",
            ActionKind::Refresh => "refresh",
            ActionKind::Screenshot => "screenshot",
            ActionKind::SwitchApp => "switch_app",
            ActionKind::Chain => "chain",
            ActionKind::Chat => "chat",
            ActionKind::Clarify => "clarify",
            ActionKind::Unknown => "unknown",
            ActionKind::Error => "error",
            ActionKind::Unrecognized => "unrecognized",
        }
    }

    /// Whether the action drives the desktop
    pub fn is_physical(&self) -> bool {
        Self::PHYSICAL.contains(self)
    }

    /// Fixed keypress for the window/system shortcut actions
    pub fn fixed_combo(&self) -> Option<&'static str> {
        match self {
            ActionKind::Save => Some("ctrl+s"),
            ActionKind::Minimize => Some("win+down"),
            ActionKind::Maximize => Some("win+up"),
            ActionKind::CloseWindow => Some("alt+f4"),
            ActionKind::Refresh => Some("f5"),
            ActionKind::Screenshot => Some("win+shift+s"),
            ActionKind::SwitchApp => Some("alt+tab"),
            _ => None,
        }
    }
}
