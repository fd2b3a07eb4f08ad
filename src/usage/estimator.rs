//! Token estimation utilities.
//!
//! The inference provider does not report usage, so token counts are
//! estimated from text length.

use serde::{Deserialize, Serialize};

/// Default bytes per token (roughly 4 characters per token for English).
pub const DEFAULT_CHARS_PER_TOKEN: u64 = 4;

/// Character-count token estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEstimator {
    chars_per_token: u64,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

impl TokenEstimator {
    /// Create an estimator with a custom ratio. Zero is treated as one.
    pub fn new(chars_per_token: u64) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }

    /// Estimate tokens from text: byte length divided by the ratio, rounded down.
    pub fn estimate(&self, text: &str) -> u64 {
        text.len() as u64 / self.chars_per_token
    }

    /// Estimate both sides of one interaction.
    pub fn estimate_interaction(&self, prompt: &str, output: &str) -> TokenCount {
        TokenCount::new(self.estimate(prompt), self.estimate(output))
    }
}

/// Token count for an interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    /// Input/prompt tokens
    pub input_tokens: u64,
    /// Output/completion tokens
    pub output_tokens: u64,
}

impl TokenCount {
    /// Create a new token count.
    pub fn new(input: u64, output: u64) -> Self {
        Self {
            input_tokens: input,
            output_tokens: output,
        }
    }

    /// Get total tokens.
    pub fn total(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}
