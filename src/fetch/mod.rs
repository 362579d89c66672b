// src/fetch/mod.rs
// =============================================================================
// This module is the only place that talks to the network.
//
// Submodules:
// - request: the Request/Response values every fetch works with
// - http: the real fetcher, built on reqwest
// - memory: a fixture fetcher that serves canned pages (tests, offline demos)
// - lines: turns a chunked HTTP body into a stream of text lines
//
// Everything else in the crate takes `&dyn Fetcher`, so the same extraction
// code runs against live sites and against fixtures.
// =============================================================================

mod http;
mod lines;
mod memory;
mod request;

use anyhow::Result;
use async_trait::async_trait;

pub use http::{HttpFetcher, DEFAULT_USER_AGENT};
pub use lines::split_lines;
pub use memory::MemoryFetcher;
pub use request::{Request, Response};

/// Something that can turn a `Request` into a `Response`.
///
/// A transport failure (DNS, connection refused, timeout) is an `Err`.
/// A server that answers with 404 or 500 is still an `Ok(Response)`; callers
/// decide what a bad status means for them.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait here?
//    - A trait is a contract: "anything that can fetch"
//    - HttpFetcher fulfils it with real requests, MemoryFetcher with fixtures
//    - Tests get deterministic pages without touching the internet
//
// 2. What is #[async_trait]?
//    - Traits can't (portably) hold async fns that are usable as `dyn Trait`
//    - The async-trait crate rewrites them to return boxed futures
//    - You write `async fn`, it handles the plumbing
//
// 3. Why `Send + Sync`?
//    - The fetcher is shared by reference across awaits on a tokio runtime
//    - These bounds promise it is safe to do so
// -----------------------------------------------------------------------------
