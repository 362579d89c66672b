// src/fetch/http.rs
// =============================================================================
// The real fetcher: one reqwest Client, reused for every request.
//
// Key functionality:
// - Plain GET with query parameters and headers
// - Reports the status code instead of failing on 4xx/5xx
// - Opens long-lived line-delimited streams (the live tweet stream)
//
// There are no retries. A request either comes back or it doesn't.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::lines::split_lines;
use super::{Fetcher, Request, Response};

/// Some sites refuse requests that don't look like they come from a browser
/// or a named client, so we always send a User-Agent.
pub const DEFAULT_USER_AGENT: &str = concat!("scrape-workshop/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a per-request timeout and User-Agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(HttpFetcher { client })
    }

    /// Like `new`, but without the overall timeout.
    ///
    /// The live stream stays open for as long as we listen, so a whole-request
    /// timeout would cut it off. The caller bounds it with its own timer.
    pub fn for_streaming(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(HttpFetcher { client })
    }

    async fn send(&self, request: &Request) -> Result<reqwest::Response> {
        let url = request.full_url()?;
        debug!(url = %request.url, "GET");

        let mut builder = self.client.get(&url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Request to {} failed", request.url))
    }

    /// Opens `request` and yields its body line by line as it arrives.
    ///
    /// A non-success status is an error here: there is no body worth reading.
    pub async fn stream_lines(&self, request: &Request) -> Result<BoxStream<'static, Result<String>>> {
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Stream {} answered HTTP {}", request.url, status.as_u16()));
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(|e| anyhow::Error::from(e.without_url())));

        Ok(split_lines(Box::pin(chunks)).boxed())
    }
}

/// The URL with query and fragment removed. Query strings carry API keys.
fn without_query(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let response = self.send(request).await?;

        let url = response.url().to_string();
        let logged_url = without_query(response.url());
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read body of {}", request.url))?;

        debug!(url = %logged_url, status, bytes = body.len(), "response");

        Ok(Response { url, status, body })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why keep one Client?
//    - reqwest::Client holds a connection pool
//    - Reusing it means repeated requests to the same site reuse connections
//    - Creating a new client per request throws that away
//
// 2. What is BoxStream?
//    - A boxed, type-erased Stream (the async version of an iterator)
//    - Handy as a return type when the concrete stream type is unnameable
//
// 3. Why is a 404 not an Err in fetch()?
//    - The server did answer; the status is information, not a crash
//    - Page scraping treats it as a failure, REST calls print it and stop
// -----------------------------------------------------------------------------
