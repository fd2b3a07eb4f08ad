//! Service configuration.
//!
//! Layers, lowest precedence first:
//! 1. embedded defaults (`config/default.toml`)
//! 2. a TOML file (`--config`, or `nollmit.toml` when present)
//! 3. `NOLLMIT_<SECTION>__<KEY>` environment variables
//!
//! `HF_API_KEY` fills `inference.api_key` when nothing else set it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::inference::{HuggingFaceConfig, ModelRegistry};
use crate::usage::{TokenEstimator, UsageStore};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Optional config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "nollmit.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "NOLLMIT";

/// Legacy credential variable
pub const API_KEY_ENV_VAR: &str = "HF_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceSettings,
    pub usage: UsageSettings,
    #[serde(default)]
    pub models: Vec<ModelOverride>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Inference provider settings.
#[derive(Clone, Deserialize)]
pub struct InferenceSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl fmt::Debug for InferenceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl InferenceSettings {
    /// Inference time bound.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Usage accounting settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageSettings {
    /// Where the usage record is persisted
    pub storage_path: PathBuf,
    /// Spectate-mode requests allowed per day
    pub spectate_daily_limit: u64,
    /// Bytes per estimated token
    pub chars_per_token: u64,
}

/// One registry override.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelOverride {
    pub player: String,
    pub model: String,
}

impl AppConfig {
    /// Load configuration. An explicit `path` must exist; otherwise
    /// `nollmit.toml` is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()
            .context("Failed to build configuration")?;

        let mut app: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if app.inference.api_key.as_deref().map_or(true, str::is_empty) {
            app.inference.api_key = std::env::var(API_KEY_ENV_VAR)
                .ok()
                .filter(|key| !key.is_empty());
        }

        Ok(app)
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// HuggingFace client settings.
    pub fn huggingface(&self) -> HuggingFaceConfig {
        let config = HuggingFaceConfig::default()
            .with_base_url(&self.inference.base_url)
            .with_max_tokens(self.inference.max_tokens)
            .with_timeout(self.inference.timeout());
        HuggingFaceConfig {
            api_key: self.inference.api_key.clone(),
            ..config
        }
    }

    /// Model registry with overrides applied.
    pub fn registry(&self) -> ModelRegistry {
        ModelRegistry::new(&self.inference.default_model).with_overrides(
            self.models
                .iter()
                .map(|o| (o.player.clone(), o.model.clone())),
        )
    }

    /// Token estimator.
    pub fn estimator(&self) -> TokenEstimator {
        TokenEstimator::new(self.usage.chars_per_token)
    }

    /// Usage record storage.
    pub fn usage_store(&self) -> UsageStore {
        UsageStore::new(&self.usage.storage_path)
    }
}
