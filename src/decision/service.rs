use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use super::{DecisionError, DecisionMode, DecisionRequest, DecisionResponse};
use crate::action::ActionParser;
use crate::inference::{
    CompletionRequest, InferenceError, InferenceProvider, ModelRegistry, SYSTEM_PROMPT,
};
use crate::usage::{SharedUsageCounter, TokenCount, TokenEstimator, UsageStats};

/// Daily request ceiling for spectate mode unless configured otherwise.
pub const DEFAULT_SPECTATE_DAILY_LIMIT: u64 = 50;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Orchestrates one decision: admission, inference, parsing, accounting.
#[derive(Clone)]
pub struct DecisionService {
    provider: Arc<dyn InferenceProvider>,
    usage: SharedUsageCounter,
    parser: ActionParser,
    registry: ModelRegistry,
    estimator: TokenEstimator,
    spectate_daily_limit: u64,
    timeout: Duration,
}

impl DecisionService {
    /// Create a service with the default registry, estimator and limits.
    pub fn new(provider: Arc<dyn InferenceProvider>, usage: SharedUsageCounter) -> Self {
        Self {
            provider,
            usage,
            parser: ActionParser::new(),
            registry: ModelRegistry::default(),
            estimator: TokenEstimator::default(),
            spectate_daily_limit: DEFAULT_SPECTATE_DAILY_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the model registry.
    pub fn with_registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the token estimator.
    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Set the spectate-mode daily ceiling.
    pub fn with_spectate_daily_limit(mut self, limit: u64) -> Self {
        self.spectate_daily_limit = limit;
        self
    }

    /// Set the inference time bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shared usage counter.
    pub fn usage(&self) -> &SharedUsageCounter {
        &self.usage
    }

    /// Whether the inference provider has credentials.
    pub fn is_ready(&self) -> bool {
        self.provider.is_configured()
    }

    /// Spectate-mode daily ceiling.
    pub fn spectate_daily_limit(&self) -> u64 {
        self.spectate_daily_limit
    }

    /// Ask the model for a decision.
    ///
    /// Only the spectate ceiling produces an error. Inference failures yield
    /// a fold whose reason carries the error, and are not counted as usage.
    pub async fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse, DecisionError> {
        self.admit(request.mode())?;

        let compact = serde_json::to_string(&request.payload).unwrap_or_default();
        let user = serde_json::to_string_pretty(&request.payload)
            .unwrap_or_else(|_| compact.clone());

        let completion = CompletionRequest {
            model: self.registry.resolve(&request.player_name).to_string(),
            system: SYSTEM_PROMPT.to_string(),
            user,
        };

        let start = Instant::now();
        let result = self.invoke(completion).await;

        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                let latency_ms = elapsed_ms(start);
                error!(
                    provider = self.provider.name(),
                    player = %request.player_name,
                    error = %err,
                    latency_ms,
                    "Inference failed, folding"
                );
                return Ok(DecisionResponse::fallback(&err, latency_ms));
            }
        };

        let decision = self.parser.parse(&raw);
        let latency_ms = elapsed_ms(start);

        let tokens = self.estimator.estimate_interaction(&compact, &raw);
        let stats = self.record_usage(tokens).await;

        info!(
            provider = self.provider.name(),
            player = %request.player_name,
            action = %decision.action,
            amount = decision.amount,
            reason = %decision.reason,
            latency_ms,
            estimated_tokens = tokens.total(),
            daily_requests = stats.daily_requests,
            monthly_requests = stats.monthly_requests,
            "Decision made"
        );

        Ok(DecisionResponse::from_decision(decision, latency_ms))
    }

    fn admit(&self, mode: DecisionMode) -> Result<(), DecisionError> {
        if mode != DecisionMode::Spectate {
            return Ok(());
        }

        let daily_requests = self.usage.daily_requests();
        if daily_requests >= self.spectate_daily_limit {
            warn!(
                daily_requests,
                limit = self.spectate_daily_limit,
                "Daily API limit reached for spectate mode"
            );
            return Err(DecisionError::SpectateLimitReached {
                limit: self.spectate_daily_limit,
            });
        }

        Ok(())
    }

    // Persisting syncs to disk under the counter lock; keep it off the async workers.
    async fn record_usage(&self, tokens: TokenCount) -> UsageStats {
        let usage = self.usage.clone();
        let recorded = tokio::task::spawn_blocking(move || {
            usage.record(tokens.input_tokens, tokens.output_tokens)
        })
        .await;

        match recorded {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "Usage recording task failed");
                self.usage.stats()
            }
        }
    }

    async fn invoke(&self, completion: CompletionRequest) -> Result<String, InferenceError> {
        match tokio::time::timeout(self.timeout, self.provider.complete(completion)).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
