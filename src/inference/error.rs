//! Error types for model inference

use thiserror::Error;

/// Inference error type
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Provider credential missing
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Provider returned an error status
    #[error("api error: {0}")]
    Api(String),

    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Call exceeded the configured time bound
    #[error("timeout after {0}ms")]
    Timeout(u64),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, InferenceError>;
