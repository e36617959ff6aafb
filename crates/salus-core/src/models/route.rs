//! Navigation target for the search results view.

use std::fmt;

/// Path of the results view.
pub const RESULTS_PATH: &str = "/search";

const QUERY_PARAM: &str = "query";

/// A results view parameterized by a single `query` parameter.
///
/// The query is stored decoded and percent-encoded exactly once when the
/// route is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultsRoute {
    query: String,
}

impl ResultsRoute {
    /// Build a route for the trimmed text, or `None` when nothing remains.
    pub fn for_query(text: &str) -> Option<Self> {
        let query = text.trim();
        if query.is_empty() {
            None
        } else {
            Some(Self {
                query: query.to_string(),
            })
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// `query=<percent-encoded text>`
    pub fn to_query_string(&self) -> String {
        format!("{QUERY_PARAM}={}", urlencoding::encode(&self.query))
    }

    /// Parse a query string such as `query=PARA%20500&page=2`.
    ///
    /// Accepts an optional leading `?`. `+` is read as a space.
    pub fn from_query_string(raw: &str) -> Option<Self> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        raw.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key != QUERY_PARAM {
                return None;
            }
            let value = value.replace('+', " ");
            let decoded = urlencoding::decode(&value).ok()?;
            Self::for_query(&decoded)
        })
    }
}

impl fmt::Display for ResultsRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{RESULTS_PATH}?{}", self.to_query_string())
    }
}
