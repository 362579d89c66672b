// src/sites/books.rs
// =============================================================================
// Scraping a book catalogue.
//
// How it works:
// 1. Build the listing page URLs ("page-1.html", "page-2.html", ...)
// 2. On each listing page, collect the link of every book
// 3. Turn each relative link into a full URL under the catalogue base
// 4. Visit every book page and read its title and description
//
// Step 4 is one request per book, so a 50-page sweep is 1000+ requests.
// Keep the politeness delay on when running against the real site.
// =============================================================================

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::extract::{absolute_url, select_attr, select_first_text};
use crate::fetch::Fetcher;
use crate::sweep::{map_urls, page_urls, paginated_sweep, BatchOutcome, FailurePolicy, Politeness};
use crate::table::Record;

/// Where a catalogue lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Book hrefs on listing pages are relative to this.
    pub base: String,
    /// Listing page URL with a `{page}` placeholder.
    pub page_template: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            base: "http://books.toscrape.com/catalogue/".to_string(),
            page_template: "http://books.toscrape.com/catalogue/page-{page}.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub url: String,
    pub title: String,
    pub description: String,
}

impl Record for BookRecord {
    const COLUMNS: &'static [&'static str] = &["url", "title", "description"];

    fn row(&self) -> Vec<String> {
        vec![self.url.clone(), self.title.clone(), self.description.clone()]
    }
}

/// Absolute URLs of every book listed on one catalogue page, in page order.
pub fn book_links(catalog: &Catalog, html: &str) -> Result<Vec<String>> {
    let hrefs = select_attr(html, "article.product_pod h3 a", "href")?;
    Ok(hrefs.iter().map(|href| absolute_url(&catalog.base, href)).collect())
}

/// Reads one book page.
///
/// A page without a title is not a book page and is an error. A missing
/// description (some books have none) is an empty string.
pub fn parse_book(url: &str, html: &str) -> Result<BookRecord> {
    let title = select_first_text(html, "div.product_main h1")?
        .ok_or_else(|| anyhow!("No book title found on {}", url))?;

    // The description is the paragraph right after the "Product Description" header.
    let description = select_first_text(html, "#product_description + p")?.unwrap_or_default();

    Ok(BookRecord {
        url: url.to_string(),
        title,
        description,
    })
}

/// Sweeps `pages` listing pages, then visits every book found.
///
/// Listing pages always abort on failure (without them there is nothing to
/// visit); `policy` decides what a failing book page does.
pub async fn scrape_books(
    fetcher: &dyn Fetcher,
    catalog: &Catalog,
    pages: u32,
    politeness: Politeness,
    policy: FailurePolicy,
) -> Result<BatchOutcome<BookRecord>> {
    let listing = page_urls(&catalog.page_template, pages);
    let links = paginated_sweep(fetcher, &listing, politeness, |_, html| book_links(catalog, html)).await?;

    info!(pages, books = links.len(), "collected book links");

    map_urls(fetcher, &links, politeness, policy, parse_book).await
}
