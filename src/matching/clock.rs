//! Time sources for queue-entry backfill and scoring
//!
//! Stored players carry no real queue telemetry, so a queue-entry instant is
//! sampled for anyone missing one. The source is injected so tests can pin it.

use crate::utils::current_timestamp;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provides the current instant and plausible queue-entry instants
pub trait TimeSource: Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;

    /// A queue-entry instant for a player with none on record. Must not be
    /// after `now` and must fall on the same day as `now`.
    fn sample_queue_entry(&self, now: DateTime<Utc>) -> DateTime<Utc>;
}

/// Wall clock with uniformly random backfill over the current UTC day
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    pub fn new() -> Self {
        Self
    }
}

/// Midnight (UTC) of the day `now` falls on
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        current_timestamp()
    }

    fn sample_queue_entry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = start_of_day(now);
        let elapsed_ms = (now - midnight).num_milliseconds().max(0);
        let offset_ms = rand::thread_rng().gen_range(0..=elapsed_ms);
        midnight + Duration::milliseconds(offset_ms)
    }
}

/// Deterministic time source for tests and benchmarks
#[derive(Debug)]
pub struct FixedTimeSource {
    now: DateTime<Utc>,
    backfill_age: Duration,
    samples: AtomicUsize,
}

impl FixedTimeSource {
    /// Backfilled players appear to have joined exactly `backfill_age` before `now`
    pub fn new(now: DateTime<Utc>, backfill_age: Duration) -> Self {
        Self {
            now,
            backfill_age,
            samples: AtomicUsize::new(0),
        }
    }

    /// Backfilled players appear to have joined at `now`
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::new(now, Duration::zero())
    }

    /// Number of queue-entry instants handed out so far
    pub fn samples_taken(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn sample_queue_entry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.samples.fetch_add(1, Ordering::SeqCst);
        now - self.backfill_age
    }
}
