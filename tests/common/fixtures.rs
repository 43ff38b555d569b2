//! Search response fixtures and mock mounting helpers

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the article search endpoint
pub const SEARCH_PATH: &str = "/svc/search/v2/articlesearch.json";

/// Error body the API sends for a rejected key
pub fn error_body() -> Value {
    json!({"status": "ERROR", "errors": ["Invalid API key"], "results": []})
}

/// One page of fake articles published in the month of `begin_date`
pub fn page_body(begin_date: &str, page: u32, hits: u32) -> Value {
    let docs_on_page = hits.saturating_sub(page * 10).min(10);
    let docs: Vec<Value> = (0..docs_on_page)
        .map(|i| {
            let n = page * 10 + i;
            json!({
                "web_url": article_url(begin_date, n),
                "pub_date": format!("{}-{}-01T00:00:00+0000", &begin_date[..4], &begin_date[4..6]),
                "headline": {"main": format!("Story {n}\nfrom {begin_date}")}
            })
        })
        .collect();

    json!({
        "status": "OK",
        "response": {
            "docs": docs,
            "meta": {"hits": hits, "offset": page * 10}
        }
    })
}

/// URL of the `n`th fake article in a window
pub fn article_url(begin_date: &str, n: u32) -> String {
    format!("https://www.nytimes.com/{begin_date}/story-{n}.html")
}

/// Mount every page of a window with `hits` results, each expected exactly once
pub async fn mount_window(server: &MockServer, begin_date: &str, hits: u32) {
    let last = if hits <= 10 {
        0
    } else if hits % 10 == 0 {
        hits / 10 - 1
    } else {
        hits / 10
    };

    for page in 0..=last {
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("begin_date", begin_date))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(begin_date, page, hits)))
            .expect(1)
            .mount(server)
            .await;
    }
}

/// Mount a window whose first request gets `response` (expected once)
pub async fn mount_window_response(server: &MockServer, begin_date: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("begin_date", begin_date))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Assert that a window is never requested
pub async fn forbid_window(server: &MockServer, begin_date: &str) {
    Mock::given(method("GET"))
        .and(query_param("begin_date", begin_date))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
