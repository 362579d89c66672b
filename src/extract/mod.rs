// src/extract/mod.rs
// =============================================================================
// Pulling values out of HTML pages.
//
// Submodules:
// - select: fetch a page, run a CSS selector, return text or attributes
// - urls: rebuild absolute URLs from the relative hrefs pages contain
// - text: whitespace cleanup and filename-safe titles
// =============================================================================

mod select;
mod text;
mod urls;

pub(crate) use select::element_text;
pub use select::{fetch_html, select_attr, select_first_text, select_text, selector};
pub use text::{normalize_ws, sanitize_filename};
pub use urls::{absolute_url, resolve_href};
