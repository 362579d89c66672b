// src/fetch/request.rs
// =============================================================================
// Plain values describing one HTTP GET and its answer.
//
// A Request is an endpoint URL plus query parameters and headers. Query
// parameters are kept separate from the URL so API keys and search terms get
// percent-encoded properly when the final URL is rendered.
// =============================================================================

use anyhow::{Context, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// A GET for `url` with no parameters or headers yet.
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds the parameter only when there is a value for it.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `Authorization: Bearer <token>`, used by the Yelp and Twitter APIs.
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    /// Renders the URL with the query parameters encoded onto it.
    ///
    /// Example:
    ///   Request::get("https://api.example.com/search").query("q", "rust lang")
    ///   -> "https://api.example.com/search?q=rust+lang"
    pub fn full_url(&self) -> Result<String> {
        let mut url = Url::parse(&self.url)
            .with_context(|| format!("Invalid URL '{}'", self.url))?;

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url.to_string())
    }
}

/// What came back from one request: the final URL, the numeric status code
/// and the body decoded as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
