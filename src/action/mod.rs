//! Poker actions and model-reply parsing.
//!
//! Language models rarely follow a requested reply format exactly, so this
//! module accepts several shapes of reply and always produces a legal,
//! canonical [`Decision`]:
//!
//! - **Labelled**: `ACTION: RAISE` / `AMOUNT: 200` / `REASON: ...`
//! - **Line prefix**: `RAISE: 150` (only when no `ACTION:` label is present)
//!
//! Anything unrecognized becomes [`Action::Fold`].
//!
//! # Example
//!
//! ```ignore
//! use nollmit::action::{Action, ActionParser};
//!
//! let decision = ActionParser::new().parse("ACTION: BET\nAMOUNT: 40\nREASON: value");
//! assert_eq!(decision.action, Action::Raise);
//! assert_eq!(decision.amount, 40);
//! ```

mod parser;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use parser::ActionParser;

/// The canonical set of actions the service will ever emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Give up the hand. Also the fallback for anything unrecognized.
    #[default]
    Fold,
    Check,
    Call,
    /// Put chips in. `BET` replies normalize here.
    Raise,
    AllIn,
}

impl Action {
    /// All canonical actions, in display order.
    pub const ALL: [Action; 5] = [
        Action::Fold,
        Action::Check,
        Action::Call,
        Action::Raise,
        Action::AllIn,
    ];

    /// Wire name of the action (`FOLD`, `ALL_IN`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Fold => "FOLD",
            Action::Check => "CHECK",
            Action::Call => "CALL",
            Action::Raise => "RAISE",
            Action::AllIn => "ALL_IN",
        }
    }

    /// Normalize a raw action token from model output.
    ///
    /// Hyphens are stripped and case is ignored, so `all-in`, `ALLIN` and
    /// `ALL_IN` all map to [`Action::AllIn`]. `BET` maps to [`Action::Raise`].
    /// Any other token is [`Action::Fold`].
    pub fn normalize(token: &str) -> Action {
        let token = token.trim().replace('-', "").to_ascii_uppercase();
        match token.as_str() {
            "FOLD" => Action::Fold,
            "CHECK" => Action::Check,
            "CALL" => Action::Call,
            "RAISE" | "BET" => Action::Raise,
            "ALLIN" | "ALL_IN" => Action::AllIn,
            _ => Action::Fold,
        }
    }

    /// Whether the amount field is meaningful for this action.
    pub fn takes_amount(&self) -> bool {
        matches!(self, Action::Raise)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model reply interpreted as a poker action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decision {
    /// Canonical action
    pub action: Action,
    /// Chip amount; only non-zero for raises
    pub amount: u64,
    /// Model's stated reasoning (empty if none was given)
    pub reason: String,
    /// Verbatim model text
    pub raw: String,
}

impl Decision {
    /// The safe default: fold, nothing committed.
    pub fn fold(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            action: Action::Fold,
            amount: 0,
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}
