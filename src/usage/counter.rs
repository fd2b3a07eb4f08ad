//! Usage counting with write-through persistence.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use super::limits::UsageSummary;
use super::stats::{Rollover, UsageStats};
use super::store::UsageStore;

/// Process-wide usage counter backed by a [`UsageStore`].
///
/// Every mutation is persisted immediately. Storage failures are logged and
/// never surface to callers; the in-memory counters stay authoritative.
#[derive(Debug)]
pub struct UsageCounter {
    store: UsageStore,
    stats: UsageStats,
}

impl UsageCounter {
    /// Load the counter from storage, falling back to fresh stats.
    pub fn open(store: UsageStore) -> Self {
        Self::open_at(store, Local::now())
    }

    /// Load the counter as of `now`.
    pub fn open_at(store: UsageStore, now: DateTime<Local>) -> Self {
        let stats = match store.load() {
            Ok(Some(mut stats)) => {
                log_rollover(stats.roll_over(&now));
                stats
            }
            Ok(None) => {
                debug!(path = %store.path().display(), "no usage record yet, starting fresh");
                UsageStats::fresh(&now)
            }
            Err(err) => {
                warn!(
                    path = %store.path().display(),
                    error = %err,
                    "Failed to load usage stats, starting fresh"
                );
                UsageStats::fresh(&now)
            }
        };

        Self { store, stats }
    }

    /// Current stats as stored in memory (not rolled over).
    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    /// Record one successful request.
    pub fn record(&mut self, input_tokens: u64, output_tokens: u64) {
        self.record_at(input_tokens, output_tokens, Local::now());
    }

    /// Record one successful request at `now`.
    pub fn record_at(&mut self, input_tokens: u64, output_tokens: u64, now: DateTime<Local>) {
        log_rollover(self.stats.roll_over(&now));
        self.stats.record(input_tokens, output_tokens, &now);
        self.persist();
    }

    /// Discard all stats and persist fresh defaults.
    pub fn reset(&mut self) {
        self.reset_at(Local::now());
    }

    /// Discard all stats as of `now`.
    pub fn reset_at(&mut self, now: DateTime<Local>) {
        info!("Resetting usage stats");
        self.stats = UsageStats::fresh(&now);
        self.persist();
    }

    /// Requests recorded today.
    pub fn daily_requests(&self) -> u64 {
        self.daily_requests_at(Local::now())
    }

    /// Requests recorded on the day of `now`; a stale stored day counts as 0.
    pub fn daily_requests_at(&self, now: DateTime<Local>) -> u64 {
        self.stats.rolled(&now).daily_requests
    }

    /// Requests recorded this month.
    pub fn monthly_requests(&self) -> u64 {
        self.monthly_requests_at(Local::now())
    }

    /// Requests recorded in the month of `now`.
    pub fn monthly_requests_at(&self, now: DateTime<Local>) -> u64 {
        self.stats.rolled(&now).monthly_requests
    }

    /// Usage summary with remaining quota for each tier.
    pub fn summary(&self) -> UsageSummary {
        self.summary_at(Local::now())
    }

    /// Usage summary as of `now`.
    pub fn summary_at(&self, now: DateTime<Local>) -> UsageSummary {
        UsageSummary::from_stats(self.stats.rolled(&now))
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.stats) {
            warn!(
                path = %self.store.path().display(),
                error = %err,
                "Failed to save usage stats"
            );
        }
    }
}

fn log_rollover(rollover: Rollover) {
    match rollover {
        Rollover::Monthly => info!("New month, resetting usage stats"),
        Rollover::Daily => info!("New day, resetting daily request count"),
        Rollover::None => {}
    }
}

/// Thread-safe usage counter.
///
/// A single lock serializes the whole read-modify-persist cycle, so
/// concurrent records never lose updates.
#[derive(Debug, Clone)]
pub struct SharedUsageCounter {
    inner: Arc<Mutex<UsageCounter>>,
}

impl SharedUsageCounter {
    /// Wrap a counter for sharing across tasks.
    pub fn new(counter: UsageCounter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(counter)),
        }
    }

    /// Load from storage and wrap.
    pub fn open(store: UsageStore) -> Self {
        Self::new(UsageCounter::open(store))
    }

    /// Record one successful request and return the stats it produced.
    ///
    /// Blocks on the disk write; async callers should go through
    /// `spawn_blocking`.
    pub fn record(&self, input_tokens: u64, output_tokens: u64) -> UsageStats {
        let mut counter = self.lock();
        counter.record(input_tokens, output_tokens);
        counter.stats().clone()
    }

    /// Discard all stats. Blocks on the disk write.
    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Requests recorded today.
    pub fn daily_requests(&self) -> u64 {
        self.lock().daily_requests()
    }

    /// Requests recorded this month.
    pub fn monthly_requests(&self) -> u64 {
        self.lock().monthly_requests()
    }

    /// Usage summary.
    pub fn summary(&self) -> UsageSummary {
        self.lock().summary()
    }

    /// Snapshot of the in-memory stats.
    pub fn stats(&self) -> UsageStats {
        self.lock().stats().clone()
    }

    // Counter state stays consistent even if a holder panicked mid-call:
    // every mutation is a plain field update followed by a save.
    fn lock(&self) -> MutexGuard<'_, UsageCounter> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
