//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! hosted OpenAI endpoints, vLLM, LocalAI, llama-server, and so on.
//!
//! # Configuration
//!
//! Environment variables:
//! - `ADVISOR_HOST`: Server URL (required)
//! - `ADVISOR_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `ADVISOR_API_KEY`: Bearer token if required (optional)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdvisorBackend, AdvisorError};

/// Fixed system prompt for tip generation
const SYSTEM_PROMPT: &str =
    "You are an expert financial advisor. Be specific and action-oriented.";

/// Bound on the length of a generated tip
const MAX_TIP_TOKENS: u32 = 100;

/// Sampling temperature for tip generation
const TIP_TEMPERATURE: f32 = 0.7;

/// A generation call must never block a cycle indefinitely
const GENERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// export ADVISOR_HOST="https://api.openai.com"
/// export ADVISOR_MODEL="gpt-3.5-turbo"
/// export ADVISOR_API_KEY="sk-..."
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        let mut backend = Self::new(base_url, model);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Create from environment variables
    ///
    /// Required: `ADVISOR_HOST`
    /// Optional: `ADVISOR_MODEL` (default: gpt-3.5-turbo)
    /// Optional: `ADVISOR_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("ADVISOR_HOST").ok()?;
        let model =
            std::env::var("ADVISOR_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let api_key = std::env::var("ADVISOR_API_KEY").ok();

        let mut backend = Self::new(&host, &model);
        backend.api_key = api_key;
        Some(backend)
    }

    /// Make a chat completion request, mapping every failure mode to a
    /// typed `AdvisorError`
    async fn chat_completion(&self, user_content: &str) -> Result<String, AdvisorError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content.to_string(),
                },
            ],
            temperature: Some(TIP_TEMPERATURE),
            max_tokens: Some(MAX_TIP_TOKENS),
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(GENERATION_TIMEOUT)
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AdvisorError::Timeout
            } else {
                AdvisorError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 => AdvisorError::Auth,
                429 => AdvisorError::RateLimited,
                code => AdvisorError::Api { status: code },
            });
        }

        let chat_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AdvisorError::Timeout
            } else {
                AdvisorError::Transport(format!("malformed response body: {}", e))
            }
        })?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(AdvisorError::Empty);
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl AdvisorBackend for OpenAICompatibleBackend {
    async fn generate_tip(&self, summary: &str) -> Result<String, AdvisorError> {
        debug!(model = %self.model, "Requesting generated tip");
        let user_content = format!("Turn this into a helpful tip for the user:\n\n{}", summary);
        self.chat_completion(&user_content).await
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .timeout(GENERATION_TIMEOUT);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        match req_builder.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}
