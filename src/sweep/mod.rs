// src/sweep/mod.rs
// =============================================================================
// Applying one extraction to many pages.
//
// Submodules:
// - pages: build page URLs from a template and sweep them in order
// - batch: map an extraction over a list of links, optionally skipping
//   the ones that fail
//
// Everything runs one request at a time, in order, with an optional pause
// between requests so we don't hammer the site.
// =============================================================================

mod batch;
mod pages;

use std::time::Duration;

pub use batch::{map_urls, BatchOutcome, FailurePolicy, Skipped};
pub use pages::{page_urls, paginated_sweep};

/// Pause between consecutive requests in a sweep or batch.
///
/// Zero means no pause (what the tests use).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Politeness {
    pub delay: Duration,
}

impl Politeness {
    pub fn from_millis(ms: u64) -> Self {
        Politeness {
            delay: Duration::from_millis(ms),
        }
    }

    pub(crate) async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
