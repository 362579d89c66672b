// src/sweep/batch.rs
// =============================================================================
// Bulk mapping: run the same extraction on a list of links.
//
// Two policies:
// - Abort: the first failing link stops the batch and returns the error
// - Skip: catch the failure, log it, remember it, and carry on
//
// Results keep the order of the input links (minus the skipped ones).
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use super::Politeness;
use crate::extract::fetch_html;
use crate::fetch::Fetcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Abort,
    Skip,
}

/// A link that failed under `FailurePolicy::Skip`, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub url: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub items: Vec<T>,
    pub skipped: Vec<Skipped>,
}

/// Fetches each URL and runs `extract` on its HTML, one at a time.
///
/// Under `Skip`, both fetch and extraction failures are skipped. Under
/// `Abort`, either one ends the batch.
pub async fn map_urls<T, F>(
    fetcher: &dyn Fetcher,
    urls: &[String],
    politeness: Politeness,
    policy: FailurePolicy,
    extract: F,
) -> Result<BatchOutcome<T>>
where
    F: Fn(&str, &str) -> Result<T>,
{
    let mut outcome = BatchOutcome {
        items: Vec::with_capacity(urls.len()),
        skipped: Vec::new(),
    };

    for (i, url) in urls.iter().enumerate() {
        if i > 0 {
            politeness.pause().await;
        }

        let result = match fetch_html(fetcher, url).await {
            Ok(html) => extract(url, &html).with_context(|| format!("Failed to extract from {}", url)),
            Err(e) => Err(e),
        };

        match (result, policy) {
            (Ok(item), _) => outcome.items.push(item),
            (Err(e), FailurePolicy::Abort) => return Err(e),
            (Err(e), FailurePolicy::Skip) => {
                warn!(url = %url, error = %e, "skipping link");
                outcome.skipped.push(Skipped {
                    url: url.clone(),
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    Ok(outcome)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why match on a tuple (result, policy)?
//    - It lists every combination in one place
//    - The compiler checks we didn't forget one
//
// 2. What does {:#} do for an anyhow error?
//    - It prints the error together with its context chain on one line
//    - e.g. "Failed to extract from http://...: Invalid CSS selector ..."
// -----------------------------------------------------------------------------
