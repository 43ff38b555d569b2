//! Run-wide counters and the mutable context threaded through a fetch

use crate::config::RateLimitConfig;
use crate::rate_limit::RequestGate;
use chrono::{DateTime, Utc};
use tracing::info;

/// Cumulative counters for one process run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Requests sent to the search endpoint
    pub requests: u64,
    /// Result records produced from fetched pages
    pub results: u64,
    /// Wall-clock time the most recent request was started
    pub last_request: Option<DateTime<Utc>>,
}

impl RunStats {
    /// Read-only copy of the counters, for end-of-run reporting
    pub fn snapshot(&self) -> RunStats {
        self.clone()
    }

    pub(crate) fn record_request(&mut self) {
        self.requests += 1;
        self.last_request = Some(Utc::now());
    }

    pub(crate) fn record_results(&mut self, count: usize) {
        self.results += count as u64;
    }

    /// Log the counters at info level
    pub fn log_summary(&self) {
        info!(requests = self.requests, "number of requests: {}", self.requests);
        info!(results = self.results, "number of hits: {}", self.results);
        match self.last_request {
            Some(at) => info!("last request at {}", at.to_rfc3339()),
            None => info!("no requests were made"),
        }
    }
}

/// Mutable state shared by every fetch of a run
///
/// Holds the request gate and the counters. Each run (or test) owns its own
/// context and lends it to the fetch engine by `&mut`.
#[derive(Debug)]
pub struct RunContext {
    gate: RequestGate,
    stats: RunStats,
}

impl RunContext {
    /// Create a context with a fresh gate and zeroed counters
    pub fn new(rate_limit: &RateLimitConfig) -> Self {
        Self::with_gate(RequestGate::new(rate_limit.min_interval))
    }

    /// Create a context around an existing gate
    pub fn with_gate(gate: RequestGate) -> Self {
        Self {
            gate,
            stats: RunStats::default(),
        }
    }

    /// Counters so far
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    /// Claim the next request slot and count the request
    pub(crate) async fn begin_request(&mut self) {
        self.gate.acquire().await;
        self.stats.record_request();
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_context_starts_empty() {
        let ctx = RunContext::new(&RateLimitConfig::default());
        assert_eq!(ctx.stats(), &RunStats::default());
        assert!(ctx.gate.last_request().is_none());
    }

    #[tokio::test]
    async fn test_begin_request_counts_and_stamps() {
        let mut ctx = RunContext::with_gate(RequestGate::new(Duration::ZERO));

        let before = Utc::now();
        ctx.begin_request().await;
        ctx.begin_request().await;

        let stats = ctx.stats().snapshot();
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.results, 0);
        assert!(stats.last_request.unwrap() >= before);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut stats = RunStats::default();
        stats.record_results(10);
        let snapshot = stats.snapshot();

        stats.record_results(3);

        assert_eq!(snapshot.results, 10);
        assert_eq!(stats.results, 13);
    }
}
