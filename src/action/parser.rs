//! Free-text model reply parsing.

use regex::Regex;
use tracing::debug;

use super::{Action, Decision};

/// Line-prefix tokens tried when the reply has no `ACTION:` label.
/// Order matters: the first token with a matching line wins.
const PREFIX_TOKENS: [&str; 8] = [
    "FOLD", "CHECK", "CALL", "BET", "RAISE", "ALL_IN", "ALL-IN", "ALLIN",
];

/// Parser that turns an unstructured model reply into a [`Decision`].
///
/// Parsing is total: every input yields a decision, and anything that cannot
/// be read as a known action becomes a fold.
#[derive(Debug, Clone)]
pub struct ActionParser {
    action_label: Option<Regex>,
    action_field: Option<Regex>,
    amount_field: Option<Regex>,
    reason_field: Option<Regex>,
    prefixes: Vec<(&'static str, Regex)>,
}

impl Default for ActionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionParser {
    /// Create a new parser.
    pub fn new() -> Self {
        let prefixes = PREFIX_TOKENS
            .iter()
            .filter_map(|token| {
                let pattern = format!(r"(?im)^{}[:\s]*(\d*)", regex::escape(token));
                Regex::new(&pattern).ok().map(|re| (*token, re))
            })
            .collect();

        Self {
            action_label: Regex::new(r"(?i)ACTION:").ok(),
            action_field: Regex::new(r"(?i)ACTION:\s*([\w-]+)").ok(),
            amount_field: Regex::new(r"(?i)AMOUNT:\s*(\d+)").ok(),
            reason_field: Regex::new(r"(?i)REASON:\s*(.+)").ok(),
            prefixes,
        }
    }

    /// Parse a model reply.
    pub fn parse(&self, text: &str) -> Decision {
        let mut token = capture(self.action_field.as_ref(), text).map(str::to_string);
        let mut amount = capture(self.amount_field.as_ref(), text)
            .and_then(|digits| digits.parse::<u64>().ok())
            .unwrap_or(0);
        let reason = capture(self.reason_field.as_ref(), text)
            .map(|r| r.trim().to_string())
            .unwrap_or_default();

        if !self.has_action_label(text) {
            if let Some((prefix, digits)) = self.match_line_prefix(text) {
                debug!(prefix, "reply has no ACTION label, using line prefix");
                token = Some(prefix.to_string());
                if let Ok(value) = digits.parse::<u64>() {
                    amount = value;
                }
            }
        }

        let action = token
            .as_deref()
            .map(Action::normalize)
            .unwrap_or(Action::Fold);

        if !action.takes_amount() {
            amount = 0;
        }

        Decision {
            action,
            amount,
            reason,
            raw: text.to_string(),
        }
    }

    fn has_action_label(&self, text: &str) -> bool {
        self.action_label
            .as_ref()
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    }

    /// Find the first prefix token (in trial order) that starts some line,
    /// returning it with any digits that follow.
    fn match_line_prefix<'t>(&self, text: &'t str) -> Option<(&'static str, &'t str)> {
        self.prefixes.iter().find_map(|(token, re)| {
            re.captures(text).map(|caps| {
                let digits = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                (*token, digits)
            })
        })
    }
}

fn capture<'t>(re: Option<&Regex>, text: &'t str) -> Option<&'t str> {
    re?.captures(text)?.get(1).map(|m| m.as_str())
}
