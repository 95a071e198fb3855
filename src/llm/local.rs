//! Client for a local Ollama daemon

use crate::core::config::LocalReasonerConfig;
use crate::core::error::{AgentError, Result};
use crate::llm::backend::ReasoningBackend;
use crate::llm::client::Message;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Local reasoning tier over Ollama's HTTP API
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    num_predict: u32,
}

impl OllamaClient {
    pub fn from_config(config: &LocalReasonerConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client builder failed ({}), using defaults", e);
                Client::new()
            });
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            num_predict: config.max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Model names the daemon has pulled
    async fn installed_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AgentError::Reasoning(format!(
                "Ollama tags returned {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Whether `wanted` is served by one of `installed`
///
/// Matches the exact tag, or any tag of the same base model
/// (`llama3.1:8b` is served by `llama3.1:latest`).
pub fn model_matches(wanted: &str, installed: &[String]) -> bool {
    let base = |name: &str| name.split(':').next().unwrap_or(name).to_string();
    let wanted_base = base(wanted);
    installed
        .iter()
        .any(|name| name == wanted || base(name) == wanted_base)
}

#[async_trait]
impl ReasoningBackend for OllamaClient {
    fn name(&self) -> &str {
        "local"
    }

    async fn is_available(&self) -> bool {
        match self.installed_models().await {
            Ok(models) => {
                let found = model_matches(&self.model, &models);
                if !found {
                    tracing::debug!("Ollama is running but {} is not pulled", self.model);
                }
                found
            }
            Err(e) => {
                tracing::debug!("Ollama unreachable: {}", e);
                false
            }
        }
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        tracing::debug!("Local completion with {}", self.model);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Reasoning(format!(
                "Ollama error {}: {}",
                status, error_text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;

        if chat.message.content.trim().is_empty() {
            return Err(AgentError::Reasoning("Empty response".into()));
        }
        Ok(chat.message.content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}
