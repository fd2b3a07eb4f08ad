//! Provider usage accounting.
//!
//! The inference provider enforces quotas we cannot query, so usage is
//! estimated locally and persisted across restarts:
//!
//! - **UsageStats**: the persisted record, with monthly and daily rollover
//! - **UsageStore**: JSON file persistence
//! - **UsageCounter** / **SharedUsageCounter**: write-through counting
//! - **QuotaTier** / **UsageSummary**: remaining quota for the free and pro plans
//! - **TokenEstimator**: character-count token estimates
//!
//! # Example
//!
//! ```ignore
//! use nollmit::usage::{SharedUsageCounter, UsageStore};
//!
//! let counter = SharedUsageCounter::open(UsageStore::new(".usage_stats.json"));
//! counter.record(1_200, 60);
//!
//! let summary = counter.summary();
//! println!("{} tokens left on the free tier", summary.limits.free.tokens_remaining);
//! ```

mod counter;
mod estimator;
mod limits;
mod stats;
mod store;

pub use counter::{SharedUsageCounter, UsageCounter};
pub use estimator::{TokenCount, TokenEstimator, DEFAULT_CHARS_PER_TOKEN};
pub use limits::{QuotaTier, TierLimits, TierUsage, UsageSummary, SUMMARY_NOTE};
pub use stats::{date_key, month_key, Rollover, UsageStats};
pub use store::{UsageError, UsageResult, UsageStore};
