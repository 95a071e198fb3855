//! Async client for the remote reasoning tier
//!
//! Model-agnostic HTTP client for hosted chat-completion APIs. Speaks the
//! OpenAI-compatible format (SambaNova, DeepSeek, OpenAI, ...) and the
//! Anthropic messages format, picked from the endpoint URL.

use crate::core::config::RemoteReasonerConfig;
use crate::core::error::{AgentError, Result};
use crate::llm::backend::ReasoningBackend;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: Option<String>, api_url: String, model: String) -> Self {
        let defaults = RemoteReasonerConfig::default();
        Self::build(
            api_key,
            api_url,
            model,
            defaults.temperature,
            defaults.max_tokens,
            Duration::from_secs(defaults.timeout_secs),
        )
    }

    /// Create a client from the remote tier's configuration
    pub fn from_config(config: &RemoteReasonerConfig) -> Self {
        Self::build(
            config.api_key.clone(),
            config.url.clone(),
            config.model.clone(),
            config.temperature,
            config.max_tokens,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn build(
        api_key: Option<String>,
        api_url: String,
        model: String,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!("HTTP client builder failed ({}), using defaults", e);
            Client::new()
        });
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_url,
            model,
            temperature,
            max_tokens,
            api_format,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AgentError::Reasoning("LLM_API_KEY not set".into()))
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system.into(),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", self.api_key()?)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Reasoning(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| AgentError::Reasoning("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object".into(),
            },
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
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key()?))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Reasoning(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Reasoning(e.to_string()))?;

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AgentError::Reasoning("Empty response".into()))
    }
}

#[async_trait]
impl ReasoningBackend for LlmClient {
    fn name(&self) -> &str {
        "remote"
    }

    /// Configured with a key; reachability is only known after a request
    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        tracing::debug!("Remote completion with {}", self.model);
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
        }
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// Shared
#[derive(Serialize)]
pub(crate) struct Message {
    pub role: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LlmClient::new(
            Some("test-key".into()),
            "https://api.example.com".into(),
            "test-model".into(),
        );
        assert_eq!(client.api_key.as_deref(), Some("test-key"));
        assert_eq!(client.api_url, "https://api.example.com");
        assert_eq!(client.model(), "test-model");
        assert_eq!(client.api_format(), &ApiFormat::OpenAI);
    }

    #[test]
    fn test_detect_anthropic() {
        let client = LlmClient::new(
            Some("k".into()),
            "https://api.anthropic.com/v1/messages".into(),
            "claude".into(),
        );
        assert_eq!(client.api_format(), &ApiFormat::Anthropic);
    }

    #[tokio::test]
    async fn test_unavailable_without_key() {
        let client = LlmClient::from_config(&RemoteReasonerConfig::default());
        assert!(!client.is_available().await);
        assert!(client.complete("s", "u").await.is_err());
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let client = LlmClient::new(Some("  ".into()), "http://x".into(), "m".into());
        assert!(!client.is_available().await);
    }

    #[test]
    fn test_openai_request_shape() {
        let request = OpenAIRequest {
            model: "m".into(),
            max_tokens: 512,
            temperature: 0.1,
            response_format: ResponseFormat {
                kind: "json_object".into(),
            },
            messages: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["max_tokens"], 512);
    }
}
