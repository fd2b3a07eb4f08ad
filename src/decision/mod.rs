//! Decision orchestration.
//!
//! Composes the inference provider, the [`ActionParser`](crate::action::ActionParser)
//! and the usage counter into a single `decide` call. Inference failures never
//! reach the caller: they become a fold carrying the error text. The only
//! error a caller sees is the spectate-mode daily ceiling.

mod service;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::action::{Action, Decision};

pub use service::{DecisionService, DEFAULT_SPECTATE_DAILY_LIMIT};

/// Mode value that selects the throttled spectate path.
pub const SIMULATE_MODE: &str = "simulate";

/// How a decision request is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionMode {
    /// A human is at the table; no extra throttle.
    #[default]
    Normal,
    /// All seats are models; subject to the spectate daily ceiling.
    Spectate,
}

impl DecisionMode {
    /// Interpret the optional wire `mode` field.
    pub fn from_wire(mode: Option<&str>) -> Self {
        match mode {
            Some(SIMULATE_MODE) => DecisionMode::Spectate,
            _ => DecisionMode::Normal,
        }
    }
}

/// Inbound decision request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Display name of the seat asking for a decision
    pub player_name: String,
    /// Game state, forwarded to the model verbatim
    pub payload: Map<String, Value>,
    /// `"simulate"` for spectate mode; anything else is normal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl DecisionRequest {
    /// Create a normal-mode request.
    pub fn new(player_name: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            player_name: player_name.into(),
            payload,
            mode: None,
        }
    }

    /// Set the wire mode.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Admission mode for this request.
    pub fn mode(&self) -> DecisionMode {
        DecisionMode::from_wire(self.mode.as_deref())
    }
}

/// Outbound decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub action: Action,
    pub amount: u64,
    pub reason: String,
    /// Verbatim model text; empty when inference failed
    pub raw: String,
    /// Time spent on inference and parsing
    pub latency_ms: u64,
}

impl DecisionResponse {
    /// Attach a latency to a parsed decision.
    pub fn from_decision(decision: Decision, latency_ms: u64) -> Self {
        Self {
            action: decision.action,
            amount: decision.amount,
            reason: decision.reason,
            raw: decision.raw,
            latency_ms,
        }
    }

    /// Fold response for a failed inference call.
    pub fn fallback(error: &impl std::fmt::Display, latency_ms: u64) -> Self {
        Self::from_decision(Decision::fold(format!("Error: {}", error), ""), latency_ms)
    }
}

/// Errors surfaced to decision callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// Spectate mode hit its daily ceiling; inference was not attempted.
    #[error("Daily API limit reached for spectate mode ({limit} requests/day). Please try again tomorrow.")]
    SpectateLimitReached { limit: u64 },
}
