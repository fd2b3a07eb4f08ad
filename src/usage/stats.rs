//! Persisted usage record and calendar rollover.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

const MONTH_FORMAT: &str = "%Y-%m";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Month key (`YYYY-MM`) for a timestamp.
pub fn month_key(now: &DateTime<Local>) -> String {
    now.format(MONTH_FORMAT).to_string()
}

/// Day key (`YYYY-MM-DD`) for a timestamp.
pub fn date_key(now: &DateTime<Local>) -> String {
    now.format(DATE_FORMAT).to_string()
}

/// What a rollover check changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollover {
    /// Stored month and day are current.
    None,
    /// New day in the same month: daily counter zeroed.
    Daily,
    /// New month: every counter reset.
    Monthly,
}

/// Usage counters as stored on disk.
///
/// Missing fields deserialize to zero/empty; an empty `month` is treated as
/// stale by the next rollover check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageStats {
    /// Month the cumulative counters belong to (`YYYY-MM`)
    pub month: String,
    /// Requests recorded this month
    pub monthly_requests: u64,
    /// Estimated prompt tokens this month
    pub estimated_input_tokens: u64,
    /// Estimated completion tokens this month
    pub estimated_output_tokens: u64,
    /// Day the daily counter belongs to (`YYYY-MM-DD`)
    pub date: String,
    /// Requests recorded today
    pub daily_requests: u64,
    /// First recorded request this month
    pub first_request: Option<NaiveDateTime>,
    /// Most recent recorded request
    pub last_request: Option<NaiveDateTime>,
}

impl UsageStats {
    /// Zeroed stats stamped with the given month and day.
    pub fn fresh(now: &DateTime<Local>) -> Self {
        Self {
            month: month_key(now),
            date: date_key(now),
            ..Self::default()
        }
    }

    /// Total estimated tokens (input + output).
    pub fn total_tokens(&self) -> u64 {
        self.estimated_input_tokens
            .saturating_add(self.estimated_output_tokens)
    }

    /// Bring the record up to date with the calendar.
    ///
    /// A month change replaces everything and takes precedence over the day
    /// check.
    pub fn roll_over(&mut self, now: &DateTime<Local>) -> Rollover {
        if self.month != month_key(now) {
            *self = Self::fresh(now);
            return Rollover::Monthly;
        }

        let today = date_key(now);
        if self.date != today {
            self.date = today;
            self.daily_requests = 0;
            return Rollover::Daily;
        }

        Rollover::None
    }

    /// Copy of the record as it would look after a rollover at `now`.
    pub fn rolled(&self, now: &DateTime<Local>) -> Self {
        let mut stats = self.clone();
        stats.roll_over(now);
        stats
    }

    /// Count one request with its token estimates.
    pub fn record(&mut self, input_tokens: u64, output_tokens: u64, now: &DateTime<Local>) {
        self.monthly_requests = self.monthly_requests.saturating_add(1);
        self.daily_requests = self.daily_requests.saturating_add(1);
        self.estimated_input_tokens = self.estimated_input_tokens.saturating_add(input_tokens);
        self.estimated_output_tokens = self.estimated_output_tokens.saturating_add(output_tokens);

        let stamp = now.naive_local();
        self.last_request = Some(stamp);
        self.first_request.get_or_insert(stamp);
    }
}
