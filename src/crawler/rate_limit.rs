//! Randomized request pacing
//!
//! Every outbound request is followed (and every retry preceded) by a delay
//! drawn uniformly from a configured range. One limiter is shared by all
//! tasks of a crawl; its counters are atomics so concurrent pauses never
//! corrupt them.

use crate::config::CrawlerConfig;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct RateLimiter {
    min_delay: Duration,
    max_delay: Duration,
    pauses: AtomicU64,
    paused_ms: AtomicU64,
}

impl RateLimiter {
    /// Creates a limiter drawing delays from `[min_delay, max_delay]`
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };

        Self {
            min_delay,
            max_delay,
            pauses: AtomicU64::new(0),
            paused_ms: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    /// A limiter that never sleeps
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        let min_ms = millis(self.min_delay);
        let max_ms = millis(self.max_delay);
        if min_ms == max_ms {
            return self.min_delay;
        }

        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }

    /// Sleeps for a freshly drawn delay
    pub async fn pause(&self) {
        let delay = self.next_delay();
        self.pauses.fetch_add(1, Ordering::Relaxed);
        self.paused_ms.fetch_add(millis(delay), Ordering::Relaxed);

        if delay.is_zero() {
            return;
        }

        tracing::trace!("Pausing {:.2}s before next request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }

    /// Number of pauses issued so far
    pub fn pauses(&self) -> u64 {
        self.pauses.load(Ordering::Relaxed)
    }

    /// Total time spent pausing so far
    pub fn total_paused(&self) -> Duration {
        Duration::from_millis(self.paused_ms.load(Ordering::Relaxed))
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min_delay, self.max_delay)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
