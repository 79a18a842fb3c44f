//! Request pacing for generation API calls
//!
//! Spaces outgoing calls by a minimum interval plus a small random jitter,
//! so prefetching a page of summaries produces a staggered trickle instead
//! of a burst. Slots are reserved while the lock is held and the sleep
//! happens outside it, which keeps concurrent callers from all observing
//! the same timestamp and firing together.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Minimum spacing between summary generation calls
pub const SUMMARY_MIN_INTERVAL_MS: u64 = 400;

/// Upper bound on the random jitter added to each slot
pub const SUMMARY_MAX_JITTER_MS: u64 = 200;

/// Reservation-based pacer shared across services
///
/// Each `acquire` claims the next free time slot under the lock, pushing
/// the following slot out by the minimum interval. Timestamps are stored
/// as milliseconds since the pacer's creation instant.
#[derive(Debug)]
pub struct RequestPacer {
    /// Next free slot in ms since `epoch`
    next_slot_ms: Mutex<u64>,
    epoch: Instant,
    min_interval: Duration,
    max_jitter: Duration,
    name: String,
    total_requests: AtomicU64,
    delayed_requests: AtomicU64,
}

impl RequestPacer {
    pub fn new(min_interval_ms: u64, max_jitter_ms: u64, name: &str) -> Self {
        Self {
            next_slot_ms: Mutex::new(0),
            epoch: Instant::now(),
            min_interval: Duration::from_millis(min_interval_ms),
            max_jitter: Duration::from_millis(max_jitter_ms),
            name: name.to_string(),
            total_requests: AtomicU64::new(0),
            delayed_requests: AtomicU64::new(0),
        }
    }

    /// Pacer tuned for summary prefetching
    pub fn for_summaries() -> Arc<Self> {
        Arc::new(Self::new(
            SUMMARY_MIN_INTERVAL_MS,
            SUMMARY_MAX_JITTER_MS,
            "summaries",
        ))
    }

    fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Wait until this caller's reserved slot comes up
    ///
    /// The first caller on an idle pacer proceeds after at most its jitter;
    /// every subsequent concurrent caller lands at least `min_interval`
    /// after the one before it.
    pub async fn acquire(&self) {
        let request_num = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;
        let now_ms = self.elapsed_ms();

        let jitter_ms = if self.max_jitter.is_zero() {
            0
        } else {
            rand::rng().random_range(0..=self.max_jitter.as_millis() as u64)
        };

        let slot_ms = {
            let mut next_slot = self.next_slot_ms.lock().await;
            let slot = now_ms.max(*next_slot) + jitter_ms;
            *next_slot = slot + self.min_interval.as_millis() as u64;
            slot
        };

        if slot_ms > now_ms {
            self.delayed_requests.fetch_add(1, Ordering::Relaxed);
            let target = self.epoch + Duration::from_millis(slot_ms);
            let wait = target.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                debug!(
                    "pacer {}: request #{} waiting {:?} for its slot",
                    self.name, request_num, wait
                );
                tokio::time::sleep(wait).await;
            }
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn stats(&self) -> PacerStats {
        PacerStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            delayed_requests: self.delayed_requests.load(Ordering::Relaxed),
        }
    }
}

/// Usage counters for logging and tests
#[derive(Debug, Clone, Copy)]
pub struct PacerStats {
    pub total_requests: u64,
    pub delayed_requests: u64,
}
