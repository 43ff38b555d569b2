//! Common test utilities for nytcrawler integration tests

#[allow(dead_code)]
pub mod fixtures;

pub use fixtures::*;

use nytcrawler::config::SearchConfig;
use nytcrawler::rate_limit::RequestGate;
use nytcrawler::{ArticleSearch, RunContext};
use std::time::Duration;
use wiremock::MockServer;

/// Search client pointed at a mock server
#[allow(dead_code)]
pub fn search_for(server: &MockServer) -> ArticleSearch {
    let config = SearchConfig {
        endpoint: format!("{}{}", server.uri(), SEARCH_PATH),
        ..Default::default()
    };
    ArticleSearch::with_client(reqwest::Client::new(), config)
        .expect("mock endpoint should be a valid URL")
}

/// Run context whose gate never waits
#[allow(dead_code)]
pub fn fast_context() -> RunContext {
    RunContext::with_gate(RequestGate::new(Duration::ZERO))
}
