//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` against the Ollama HTTP API:
//! `/api/tags` for health and model listing, `/api/chat` (non-streaming)
//! for completions.

use std::time::Duration;

use agentry_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost".into());
        let port = std::env::var("OLLAMA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(11434);

        Self {
            host,
            port,
            ..Default::default()
        }
    }

    /// Parse a combined base URL like `http://localhost:11434`; a missing
    /// port falls back to the default.
    pub fn from_base_url(base_url: &str) -> Self {
        let trimmed = base_url.trim_end_matches('/');
        if let Some((host, port)) = trimmed.rsplit_once(':') {
            if let Ok(port) = port.parse::<u16>() {
                return Self {
                    host: host.to_string(),
                    port,
                    ..Default::default()
                };
            }
        }
        Self {
            host: trimmed.to_string(),
            ..Default::default()
        }
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: reqwest::Client,
    config: OllamaConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    stream: bool,
    options: WireOptions,
}

#[derive(Serialize)]
struct WireOptions {
    temperature: f32,
    top_p: f32,
    num_predict: i64,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: WireMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::from_config(OllamaConfig {
            host: host.into(),
            port,
            ..Default::default()
        })
    }

    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OllamaConfig::from_env())
    }

    /// Create with default localhost settings
    pub fn localhost() -> Self {
        Self::from_config(OllamaConfig::default())
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}:{}/api/{}", self.config.host, self.config.port, endpoint)
    }

    /// Convert agent messages to the Ollama wire format
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "user", // Tools appear as user context
                };
                WireMessage {
                    role: role.to_string(),
                    content: m.content.clone(),
                }
            })
            .collect()
    }

    fn convert_completion(response: ChatResponse, model: &str) -> Completion {
        let usage = match (response.prompt_eval_count, response.eval_count) {
            (None, None) => None,
            (prompt, eval) => {
                let prompt_tokens = prompt.unwrap_or(0);
                let completion_tokens = eval.unwrap_or(0);
                Some(TokenUsage {
                    prompt_tokens,
                    completion_tokens,
                    total_tokens: prompt_tokens + completion_tokens,
                })
            }
        };

        Completion {
            content: response.message.content,
            model: model.to_string(),
            usage,
            finish_reason: Some(FinishReason::Stop),
        }
    }

    async fn fetch_tags(&self) -> Result<TagsResponse> {
        let response = self
            .client
            .get(self.api_url("tags"))
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AgentError::ProviderUnavailable(format!(
                "tags endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Ollama".into(),
            version: None, // Ollama API doesn't expose version
            models,
            supports_tools: false, // Tools are prompt-injected, not native
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.fetch_tags().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatRequest {
            model: &options.model,
            messages: Self::convert_messages(messages),
            stream: false,
            options: WireOptions {
                temperature: options.temperature,
                top_p: options.top_p,
                num_predict: i64::from(options.max_tokens),
            },
        };

        let response = self
            .client
            .post(self.api_url("chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Provider(format!("{status}: {body}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Ok(Self::convert_completion(chat, &options.model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let tags = self.fetch_tags().await?;

        Ok(tags
            .models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                name: m.name,
                context_length: None, // Not exposed by Ollama API
            })
            .collect())
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        // Llama tokenizer is roughly 4 chars per token
        (text.len() / 4) as u32
    }
}
