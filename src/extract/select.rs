// src/extract/select.rs
// =============================================================================
// Fetch-and-select: the building block of every HTML segment in the workshop.
//
// 1. Fetch the page (one request, no retry)
// 2. Parse it with scraper
// 3. Run a CSS selector and read text or an attribute from each match
//
// Watch out: a selector that matches nothing is NOT an error. You just get an
// empty Vec back. That is the classic scraping trap: a typo in a class name
// looks exactly like a page with no data. Run with -v to see a debug line
// whenever a selector comes back empty.
// =============================================================================

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::text::normalize_ws;
use crate::fetch::{Fetcher, Request};

/// Fetches `url` and returns its HTML.
///
/// Any failure (network error or a non-2xx status) is returned as an error for
/// this one request.
pub async fn fetch_html(fetcher: &dyn Fetcher, url: &str) -> Result<String> {
    let response = fetcher.fetch(&Request::get(url)).await?;

    if !response.is_success() {
        return Err(anyhow!("HTTP {} for {}", response.status, url));
    }

    Ok(response.body)
}

/// Parses a CSS selector, turning scraper's error into an anyhow error that
/// names the offending selector.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid CSS selector '{}': {:?}", css, e))
}

/// Text of every element matching `css`, in document order.
///
/// Example:
///   html = "<ul><li>a</li><li> b </li></ul>", css = "li"
///   result = ["a", "b"]
pub fn select_text(html: &str, css: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = selector(css)?;

    let values: Vec<String> = document.select(&selector).map(element_text).collect();
    log_if_empty(css, values.len());
    Ok(values)
}

/// Text of the first element matching `css`, if there is one.
pub fn select_first_text(html: &str, css: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let selector = selector(css)?;

    let value = document.select(&selector).next().map(element_text);
    log_if_empty(css, value.iter().count());
    Ok(value)
}

/// Value of attribute `attr` on every element matching `css`.
///
/// Elements that match but don't carry the attribute are skipped.
pub fn select_attr(html: &str, css: &str, attr: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = selector(css)?;

    let values: Vec<String> = document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .collect();
    log_if_empty(css, values.len());
    Ok(values)
}

/// All text inside an element, with runs of whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

fn log_if_empty(css: &str, count: usize) {
    if count == 0 {
        debug!(selector = css, "selector matched nothing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    const PAGE: &str = r#"
        <html><body>
          <div class="quote"><span class="text">First</span>
            <a class="tag" href="/tag/life/">life</a></div>
          <div class="quote"><span class="text">  Second
             line </span><a class="tag">no-href</a></div>
        </body></html>
    "#;

    #[test]
    fn test_select_text_in_order() {
        let texts = select_text(PAGE, "div.quote span.text").unwrap();
        assert_eq!(texts, vec!["First", "Second line"]);
    }

    #[test]
    fn test_select_text_is_deterministic() {
        let first = select_text(PAGE, ".quote .tag").unwrap();
        for _ in 0..5 {
            assert_eq!(select_text(PAGE, ".quote .tag").unwrap(), first);
        }
    }

    #[test]
    fn test_select_attr_skips_missing_attribute() {
        let hrefs = select_attr(PAGE, "a.tag", "href").unwrap();
        assert_eq!(hrefs, vec!["/tag/life/"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        assert!(select_text(PAGE, "span.txet").unwrap().is_empty());
        assert_eq!(select_first_text(PAGE, "h1").unwrap(), None);
    }

    #[test]
    fn test_invalid_selector_is_error() {
        assert!(select_text(PAGE, "div[").is_err());
    }

    #[tokio::test]
    async fn test_fetch_html_rejects_bad_status() {
        let fetcher = MemoryFetcher::new()
            .page("http://example.com/ok", "<p>ok</p>")
            .respond("http://example.com/gone", 404, "not found");

        assert_eq!(fetch_html(&fetcher, "http://example.com/ok").await.unwrap(), "<p>ok</p>");
        assert!(fetch_html(&fetcher, "http://example.com/gone").await.is_err());
    }
}
