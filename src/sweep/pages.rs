// src/sweep/pages.rs
// =============================================================================
// Paginated sweep.
//
// How it works:
// 1. Format page numbers 1..=N into a URL template ("/page/{page}/")
// 2. Fetch each page in turn
// 3. Run the extractor on each page's HTML
// 4. Concatenate: all of page 1's items, then page 2's, and so on
//
// There is no "last page" detection. You tell it how many pages exist.
// =============================================================================

use anyhow::{Context, Result};
use tracing::info;

use super::Politeness;
use crate::extract::fetch_html;
use crate::fetch::Fetcher;

/// The placeholder replaced by the page number in a template.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Builds `count` page URLs by putting 1, 2, ..., count into `template`.
///
/// Example:
///   page_urls("http://quotes.toscrape.com/page/{page}/", 2)
///   -> ["http://quotes.toscrape.com/page/1/", "http://quotes.toscrape.com/page/2/"]
pub fn page_urls(template: &str, count: u32) -> Vec<String> {
    (1..=count)
        .map(|page| template.replace(PAGE_PLACEHOLDER, &page.to_string()))
        .collect()
}

/// Fetches every URL in order and concatenates what `extract` finds on each.
///
/// The first failing page aborts the whole sweep. `extract` receives the page
/// URL (for resolving relative links) and its HTML.
pub async fn paginated_sweep<T, F>(
    fetcher: &dyn Fetcher,
    urls: &[String],
    politeness: Politeness,
    extract: F,
) -> Result<Vec<T>>
where
    F: Fn(&str, &str) -> Result<Vec<T>>,
{
    let mut items = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        if i > 0 {
            politeness.pause().await;
        }

        let html = fetch_html(fetcher, url).await?;
        let found = extract(url, &html).with_context(|| format!("Failed to extract from {}", url))?;

        info!(page = i + 1, url = %url, items = found.len(), "swept page");
        items.extend(found);
    }

    Ok(items)
}
