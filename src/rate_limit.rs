//! Request pacing for the search API
//!
//! The API enforces a sustained per-key request rate. [`RequestGate`] keeps
//! the start of consecutive requests at least `min_interval` apart for the whole
//! run, no matter how many windows or pages it covers.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum spacing between the starts of outbound requests
///
/// The gate is owned by a single task and driven through `&mut self`, so it
/// needs no synchronization. Time is measured on tokio's monotonic clock.
#[derive(Debug)]
pub struct RequestGate {
    /// Minimum time between two request starts
    min_interval: Duration,
    /// Start of the most recent request, if any
    last_request: Option<Instant>,
}

impl RequestGate {
    /// Create a gate with the given spacing
    ///
    /// # Examples
    ///
    /// ```
    /// use nytcrawler::rate_limit::RequestGate;
    /// use std::time::Duration;
    ///
    /// let gate = RequestGate::new(Duration::from_secs(6));
    /// assert!(gate.last_request().is_none());
    /// ```
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Configured minimum spacing
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Start of the most recent request
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Wait for the next request slot and claim it
    ///
    /// Returns immediately on the first call, or when at least `min_interval`
    /// has already passed since the previous slot. Otherwise sleeps only for
    /// the remainder of the interval. The returned instant is recorded as the
    /// new last-request time.
    pub async fn acquire(&mut self) -> Instant {
        if let Some(last) = self.last_request {
            match last.checked_add(self.min_interval) {
                Some(ready_at) => {
                    let now = Instant::now();
                    if now < ready_at {
                        let wait = ready_at - now;
                        debug!(wait_ms = wait.as_millis() as u64, "waiting for request slot");
                        tokio::time::sleep_until(ready_at).await;
                    }
                }
                // Past the clock's range; tokio saturates the deadline
                None => {
                    debug!(wait_ms = u64::MAX, "waiting for request slot");
                    tokio::time::sleep(self.min_interval).await;
                }
            }
        }

        let now = Instant::now();
        self.last_request = Some(now);
        now
    }
}
