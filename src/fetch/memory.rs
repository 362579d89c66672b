// src/fetch/memory.rs
// =============================================================================
// A fetcher that serves canned responses from memory.
//
// Register a body (and optionally a status) for a URL; fetching that URL
// returns it. Fetching any URL that was not registered fails the same way an
// unreachable host would, which is how tests simulate a broken link.
//
// Every request is recorded so tests can check which headers and query
// parameters were actually sent.
// =============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Fetcher, Request, Response};

#[derive(Debug, Default)]
pub struct MemoryFetcher {
    routes: HashMap<String, (u16, String)>,
    seen: Mutex<Vec<Request>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200 for `url`.
    ///
    /// `url` must be the full URL, query string included, exactly as
    /// `Request::full_url` renders it.
    pub fn page(self, url: &str, body: impl Into<String>) -> Self {
        self.respond(url, 200, body)
    }

    pub fn respond(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(url.to_string(), (status, body.into()));
        self
    }

    /// Serves a JSON document with status 200.
    pub fn json(self, url: &str, value: &serde_json::Value) -> Self {
        self.respond(url, 200, value.to_string())
    }

    /// Every request fetched so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        match self.seen.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        match self.seen.lock() {
            Ok(mut seen) => seen.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        let url = request.full_url()?;
        let (status, body) = self
            .routes
            .get(&url)
            .cloned()
            .ok_or_else(|| anyhow!("Could not connect to {}", url))?;

        Ok(Response { url, status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_registered_page() {
        let fetcher = MemoryFetcher::new().page("http://example.com/", "<p>hi</p>");
        let response = fetcher.fetch(&Request::get("http://example.com/")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_unknown_url_is_error() {
        let fetcher = MemoryFetcher::new();
        assert!(fetcher.fetch(&Request::get("http://example.com/missing")).await.is_err());
    }

    #[tokio::test]
    async fn test_records_requests() {
        let fetcher = MemoryFetcher::new().respond("http://example.com/?q=x", 404, "");
        let request = Request::get("http://example.com/").query("q", "x").header("app_id", "id");
        let response = fetcher.fetch(&request).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(fetcher.requests(), vec![request]);
    }
}
