//! Model inference collaborator.
//!
//! The decision service talks to exactly one provider through the
//! [`InferenceProvider`] trait; [`HuggingFaceProvider`] is the production
//! implementation.

mod error;
mod huggingface;
mod prompt;
mod registry;

use async_trait::async_trait;

pub use error::{InferenceError, Result};
pub use huggingface::{HuggingFaceConfig, HuggingFaceProvider, DEFAULT_MAX_TOKENS, HF_API_BASE};
pub use prompt::SYSTEM_PROMPT;
pub use registry::{ModelRegistry, DEFAULT_MODEL, PLAYERS};

/// A single-turn chat completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Provider model id
    pub model: String,
    /// System instruction
    pub system: String,
    /// User turn
    pub user: String,
}

/// Provider that turns a prompt into free text.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Whether credentials are present. Used by readiness checks.
    fn is_configured(&self) -> bool;

    /// Run one completion and return the reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
