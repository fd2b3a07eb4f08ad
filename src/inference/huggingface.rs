//! HuggingFace Inference Providers client.
//!
//! Uses the OpenAI-compatible chat completion route of the HuggingFace
//! router. The API does not report token usage for every provider, which is
//! why usage is estimated locally.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{InferenceError, Result};
use super::{CompletionRequest, InferenceProvider};

/// HuggingFace router base URL
pub const HF_API_BASE: &str = "https://router.huggingface.co/v1";

/// Default completion budget per decision
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// HuggingFace provider configuration
#[derive(Clone)]
pub struct HuggingFaceConfig {
    /// API token; calls fail with `NotConfigured` when absent
    pub api_key: Option<String>,
    /// Base URL (overridable for tests and self-hosted gateways)
    pub base_url: String,
    /// Completion token limit
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: HF_API_BASE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(30),
        }
    }
}

impl HuggingFaceConfig {
    /// Create a configuration with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the completion token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Mask API key for safe display
fn mask_api_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= 8 {
        return "****".to_string();
    }
    let head: String = key.chars().take(4).collect();
    let tail: String = key.chars().skip(len - 4).collect();
    format!("{}...{}", head, tail)
}

/// Sanitize API error messages
fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("invalid token")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
    {
        return "API authentication error. Please check your HF_API_KEY.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") || lower.contains("credits") {
        return "HuggingFace quota or rate limit exceeded.".to_string();
    }

    if error.len() < 200 && !error.contains("hf_") {
        return error.to_string();
    }

    "An API error occurred. Please try again.".to_string()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// HuggingFace provider
pub struct HuggingFaceProvider {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceProvider {
    /// Create a new provider
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Provider configuration
    pub fn config(&self) -> &HuggingFaceConfig {
        &self.config
    }
}

#[async_trait]
impl InferenceProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn is_configured(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InferenceError::NotConfigured("HF_API_KEY not set".to_string()))?;

        let chat_request = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending request to HuggingFace");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(self.config.timeout.as_millis() as u64)
                } else {
                    InferenceError::Network(sanitize_api_error(&e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api(format!(
                "{}: {}",
                status.as_u16(),
                sanitize_api_error(&error_text)
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::InvalidResponse("No choices in response".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| InferenceError::InvalidResponse("empty message content".to_string()))
    }
}
