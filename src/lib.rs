// src/lib.rs
// =============================================================================
// scrape-workshop: the companion code for a web-scraping workshop.
//
// Each module is one idea from the workshop:
// - fetch: getting a page or an API response (and faking one in tests)
// - extract: CSS selectors, link resolution, text cleanup
// - sweep: the same extraction over many pages or links
// - table: the rows and columns everything ends up in
// - sites: the HTML segments (a book catalogue, a quotes site)
// - api: the REST segments (Reddit, Guardian, Oxford, Yelp, Twitter)
// - store: snapshots, CSV and per-item text files
// - config: settings and credentials
//
// The binary in main.rs is a thin command-line layer over these.
// =============================================================================

pub mod api;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod sites;
pub mod store;
pub mod sweep;
pub mod table;
