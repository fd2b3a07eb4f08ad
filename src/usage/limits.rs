//! Provider quota tiers and the usage summary view.

use serde::{Deserialize, Serialize};

use super::stats::UsageStats;

/// Note attached to every summary.
pub const SUMMARY_NOTE: &str =
    "Local tracking only. Token credits reset monthly, request limits reset daily.";

/// Quota of one provider plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaTier {
    /// Plan name for display
    pub name: &'static str,
    /// Token credits per calendar month
    pub monthly_tokens: u64,
    /// Requests per calendar day
    pub daily_requests: u64,
    /// Decimal places used for percentages
    pub precision: u32,
}

impl QuotaTier {
    /// Free plan: ~100k tokens/month, 1k requests/day.
    pub const FREE: QuotaTier = QuotaTier {
        name: "free",
        monthly_tokens: 100_000,
        daily_requests: 1_000,
        precision: 1,
    };

    /// Pro plan: ~2M tokens/month, 20k requests/day.
    pub const PRO: QuotaTier = QuotaTier {
        name: "pro",
        monthly_tokens: 2_000_000,
        daily_requests: 20_000,
        precision: 2,
    };

    /// Remaining budget and percentages for the given counters.
    pub fn usage(&self, total_tokens: u64, daily_requests: u64) -> TierUsage {
        TierUsage {
            tokens_remaining: self.monthly_tokens.saturating_sub(total_tokens),
            tokens_used_pct: self.percent(total_tokens, self.monthly_tokens),
            daily_requests_remaining: self.daily_requests.saturating_sub(daily_requests),
            daily_requests_used_pct: self.percent(daily_requests, self.daily_requests),
        }
    }

    fn percent(&self, used: u64, limit: u64) -> f64 {
        if limit == 0 {
            return 0.0;
        }
        let scale = 10f64.powi(self.precision as i32);
        (used as f64 / limit as f64 * 100.0 * scale).round() / scale
    }
}

/// Remaining quota for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierUsage {
    pub tokens_remaining: u64,
    pub tokens_used_pct: f64,
    pub daily_requests_remaining: u64,
    pub daily_requests_used_pct: f64,
}

/// Both tiers, reported side by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierLimits {
    pub free: TierUsage,
    pub pro: TierUsage,
}

/// Usage stats plus derived quota figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    #[serde(flatten)]
    pub stats: UsageStats,
    pub estimated_total_tokens: u64,
    pub limits: TierLimits,
    pub note: String,
}

impl UsageSummary {
    /// Build a summary from (already rolled-over) stats.
    pub fn from_stats(stats: UsageStats) -> Self {
        let total = stats.total_tokens();
        let daily = stats.daily_requests;
        Self {
            estimated_total_tokens: total,
            limits: TierLimits {
                free: QuotaTier::FREE.usage(total, daily),
                pro: QuotaTier::PRO.usage(total, daily),
            },
            note: SUMMARY_NOTE.to_string(),
            stats,
        }
    }

    /// Format as a human-readable string.
    pub fn format(&self) -> String {
        let mut output = String::from("## Usage Summary\n\n");

        output.push_str(&format!(
            "**Month**: {} ({} requests)\n",
            self.stats.month, self.stats.monthly_requests
        ));
        output.push_str(&format!(
            "**Today**: {} ({} requests)\n",
            self.stats.date, self.stats.daily_requests
        ));
        output.push_str(&format!(
            "**Estimated Tokens**: {} ({} input, {} output)\n",
            self.estimated_total_tokens,
            self.stats.estimated_input_tokens,
            self.stats.estimated_output_tokens
        ));

        for (tier, usage) in [
            (QuotaTier::FREE, &self.limits.free),
            (QuotaTier::PRO, &self.limits.pro),
        ] {
            output.push_str(&format!(
                "**{} tier**: {} tokens left ({}% used), {} requests left today ({}% used)\n",
                tier.name,
                usage.tokens_remaining,
                usage.tokens_used_pct,
                usage.daily_requests_remaining,
                usage.daily_requests_used_pct
            ));
        }

        if let Some(last) = self.stats.last_request {
            output.push_str(&format!("**Last Request**: {}\n", last.format("%Y-%m-%d %H:%M:%S")));
        }

        output.push_str(&format!("\n_{}_\n", self.note));
        output
    }
}
