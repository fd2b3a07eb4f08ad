//! Player display name to model id mapping.

use std::collections::BTreeMap;

/// Model every seat uses unless overridden.
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";

/// Display names of the built-in seats.
pub const PLAYERS: &[&str] = &[
    "GPT-4o",
    "Claude 3.5",
    "Gemini Pro",
    "Llama 3",
    "Mistral Large",
    "DeepSeek V3",
    "Grok 2",
    "Qwen 2.5",
    "Cohere R+",
];

/// Registry resolving player names to inference model ids.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: BTreeMap<String, String>,
    default_model: String,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl ModelRegistry {
    /// Registry with every built-in seat mapped to `default_model`.
    pub fn new(default_model: impl Into<String>) -> Self {
        let default_model = default_model.into();
        let models = PLAYERS
            .iter()
            .map(|name| ((*name).to_string(), default_model.clone()))
            .collect();
        Self {
            models,
            default_model,
        }
    }

    /// Add or replace entries.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, model) in overrides {
            self.models.insert(name.into(), model.into());
        }
        self
    }

    /// Model id for a player; unknown names get the default model.
    pub fn resolve(&self, player_name: &str) -> &str {
        self.models
            .get(player_name)
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }

    /// Registered player names.
    pub fn list(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// Fallback model id.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}
