//! Request URL construction

use crate::config::SearchConfig;
use crate::date::DateWindow;
use crate::error::{Error, Result};
use url::Url;

const API_KEY_PARAM: &str = "api-key";

/// Endpoint URL carrying the fixed query parameters
///
/// Built once per client. Per-request parameters are appended to a copy in
/// [`SearchUrl::for_page`].
#[derive(Clone, Debug)]
pub(crate) struct SearchUrl {
    base: Url,
}

impl SearchUrl {
    pub(crate) fn new(config: &SearchConfig) -> Result<Self> {
        let mut base = Url::parse(&config.endpoint).map_err(|e| {
            Error::config("search.endpoint", format!("invalid endpoint URL: {e}"))
        })?;

        {
            let mut pairs = base.query_pairs_mut();
            pairs
                .append_pair("sort", &config.sort)
                .append_pair("facet_filter", bool_str(config.facet_filter))
                .append_pair("fl", &config.fields);
            for filter in &config.filters {
                pairs.append_pair("fq", filter);
            }
        }

        Ok(Self { base })
    }

    /// URL for one page of `query` within `window`
    pub(crate) fn for_page(
        &self,
        api_key: &str,
        query: &str,
        window: &DateWindow,
        page: u32,
    ) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(API_KEY_PARAM, api_key)
            .append_pair("q", query)
            .append_pair("begin_date", window.start())
            .append_pair("end_date", window.end())
            .append_pair("page", &page.to_string());
        url
    }
}

/// Copy of `url` safe to log: the API key value is masked
pub(crate) fn redacted(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
