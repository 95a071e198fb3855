//! Agent configuration with documented defaults
//!
//! Every value has a default so the agent runs with no config file at all.
//! A TOML file can override any subset of fields, and a handful of
//! environment variables override the reasoning endpoints last.
//!
//! The resulting value is handed to constructors; nothing in the crate reads
//! configuration from global state while a command is executing.

use crate::core::error::{AgentError, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub reasoning: ReasoningConfig,
    pub executor: ExecutorConfig,
    pub locator: LocatorConfig,
    pub server: ServerConfig,
}

/// Both reasoning tiers, tried local first
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub local: LocalReasonerConfig,
    pub remote: RemoteReasonerConfig,
}

/// Local (Ollama) reasoning tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalReasonerConfig {
    /// Set to false to skip the local tier entirely
    pub enabled: bool,
    /// Base URL of the Ollama daemon
    pub url: String,
    /// Model tag; availability also accepts any tag of the same base model
    pub model: String,
    pub temperature: f32,
    /// Upper bound on generated tokens (`num_predict`)
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LocalReasonerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:11434".into(),
            model: "llama3.1:8b".into(),
            temperature: 0.3,
            max_tokens: 256,
            timeout_secs: 30,
        }
    }
}

/// Remote (hosted) reasoning tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteReasonerConfig {
    /// Full chat endpoint URL. OpenAI-compatible unless it points at anthropic.com
    pub url: String,
    pub model: String,
    /// Without a key the remote tier reports itself unavailable
    pub api_key: Option<String>,
    /// Kept low so identical utterances map to identical plans
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for RemoteReasonerConfig {
    fn default() -> Self {
        Self {
            url: "https://api.sambanova.ai/v1/chat/completions".into(),
            model: "Meta-Llama-3.3-70B-Instruct".into(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 512,
            timeout_secs: 30,
        }
    }
}

/// Action execution tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Pause after launching a program so its window exists before the next step
    pub settle_delay_ms: u64,
    /// Duration of the animated pointer movement before a click
    pub pointer_move_ms: u64,
    /// Deepest allowed nesting of `chain` plans
    pub max_chain_depth: usize,
    /// Record actions instead of injecting input
    pub dry_run: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 3000,
            pointer_move_ms: 300,
            max_chain_depth: 10,
            dry_run: false,
        }
    }
}

impl ExecutorConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn pointer_move(&self) -> Duration {
        Duration::from_millis(self.pointer_move_ms)
    }
}

/// UI target search bounds
///
/// The depth and node limits are the only cap on a scan: traversal cost is
/// proportional to the size of the window's tree, not wall-clock bounded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Depth searched by the exact-name fast path
    pub direct_depth: usize,
    /// Depth searched by the fuzzy scan
    pub max_depth: usize,
    /// Maximum number of nodes the fuzzy scan will visit
    pub max_nodes: usize,
    /// Similarity ratio a fuzzy candidate must exceed
    pub fuzzy_floor: f32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            direct_depth: 3,
            max_depth: 10,
            max_nodes: 5000,
            fuzzy_floor: 0.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".into(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.addr
            .parse()
            .map_err(|e| AgentError::Config(format!("server.addr '{}': {}", self.addr, e)))
    }
}

impl AgentConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text (missing fields keep their defaults)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AgentError::Config(e.to_string()))
    }

    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)
                    .map_err(|e| AgentError::Config(format!("{}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    ///
    /// Recognised: LLM_API_KEY, LLM_API_URL, LLM_MODEL, OLLAMA_URL, OLLAMA_MODEL
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("LLM_API_KEY").filter(|k| !k.is_empty()) {
            self.reasoning.remote.api_key = Some(key);
        }
        if let Some(url) = lookup("LLM_API_URL") {
            self.reasoning.remote.url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.reasoning.remote.model = model;
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.reasoning.local.url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.reasoning.local.model = model;
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.executor.max_chain_depth == 0 {
            return Err(AgentError::Config(
                "executor.max_chain_depth must be at least 1".into(),
            ));
        }

        if self.locator.direct_depth > self.locator.max_depth {
            return Err(AgentError::Config(format!(
                "locator.direct_depth ({}) should be <= locator.max_depth ({})",
                self.locator.direct_depth, self.locator.max_depth
            )));
        }

        if !(self.locator.fuzzy_floor > 0.0 && self.locator.fuzzy_floor < 1.0) {
            return Err(AgentError::Config(format!(
                "locator.fuzzy_floor ({}) must be within (0, 1)",
                self.locator.fuzzy_floor
            )));
        }

        self.server.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.executor.max_chain_depth, 10);
        assert_eq!(config.locator.direct_depth, 3);
        assert!(config.reasoning.local.enabled);
        assert!(config.reasoning.remote.api_key.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AgentConfig::from_toml_str(
            r#"
            [executor]
            settle_delay_ms = 0

            [reasoning.local]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.executor.settle_delay_ms, 0);
        assert_eq!(config.executor.pointer_move_ms, 300);
        assert!(!config.reasoning.local.enabled);
        assert_eq!(config.reasoning.local.model, "llama3.1:8b");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = AgentConfig::from_toml_str("[executor\nsettle_delay_ms = ");
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("LLM_API_KEY", "secret"),
            ("LLM_MODEL", "big-model"),
            ("OLLAMA_MODEL", "qwen2.5:7b"),
        ]
        .into_iter()
        .collect();

        let mut config = AgentConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.reasoning.remote.api_key.as_deref(), Some("secret"));
        assert_eq!(config.reasoning.remote.model, "big-model");
        assert_eq!(config.reasoning.local.model, "qwen2.5:7b");
        assert_eq!(config.reasoning.local.url, "http://localhost:11434");
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let mut config = AgentConfig::default();
        config.apply_env(|key| (key == "LLM_API_KEY").then(String::new));
        assert!(config.reasoning.remote.api_key.is_none());
    }

    #[test]
    fn test_validation_rejects_inverted_depths() {
        let mut config = AgentConfig::default();
        config.locator.direct_depth = 12;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_chain_depth() {
        let mut config = AgentConfig::default();
        config.executor.max_chain_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_address() {
        let mut config = AgentConfig::default();
        config.server.addr = "not an address".into();
        assert!(matches!(config.validate(), Err(AgentError::Config(_))));
    }
}
