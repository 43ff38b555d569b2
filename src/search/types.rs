//! Normalized results and the wire shape of a search response

use serde::{Deserialize, Deserializer, Serialize};

/// One normalized article
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Publication timestamp, verbatim from the API
    pub pub_date: String,
    /// Canonical article URL
    pub web_url: String,
    /// Main headline on a single line
    pub headline: String,
}

impl From<Doc> for SearchResult {
    fn from(doc: Doc) -> Self {
        Self {
            pub_date: doc.pub_date,
            web_url: doc.web_url,
            headline: normalize_headline(&doc.headline.main),
        }
    }
}

/// Replace every line break in a headline with a single space
///
/// Each `'\n'` becomes exactly one space. Runs of breaks are not collapsed,
/// so `"a\n\nb"` becomes `"a  b"`.
///
/// # Examples
///
/// ```
/// use nytcrawler::search::normalize_headline;
///
/// assert_eq!(normalize_headline("Mayor Resigns\nAmid Inquiry"), "Mayor Resigns Amid Inquiry");
/// ```
pub fn normalize_headline(headline: &str) -> String {
    headline.split('\n').collect::<Vec<_>>().join(" ")
}

/// Results of one fetched page, in the order the API returned them
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageBatch {
    /// Zero-based page index
    pub page: u32,
    /// Normalized results
    pub results: Vec<SearchResult>,
}

impl PageBatch {
    /// Number of results on the page
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the page carried no documents
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl IntoIterator for PageBatch {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

/// Top-level search response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: ResponseBody,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub docs: Vec<Doc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Meta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hits: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: u32,
}

/// A raw article document
#[derive(Debug, Default, Deserialize)]
pub struct Doc {
    #[serde(default, deserialize_with = "null_as_default")]
    web_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    headline: Headline,
}

#[derive(Debug, Default, Deserialize)]
struct Headline {
    #[serde(default, deserialize_with = "null_as_default")]
    main: String,
}

// The API sends `null` for absent values; treat them like missing keys.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
