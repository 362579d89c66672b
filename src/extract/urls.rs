// src/extract/urls.rs
// =============================================================================
// Turning the relative links found on a page into URLs we can fetch.
//
// Two flavours:
// - absolute_url: glue a known base onto a path. This is what the tutorial
//   does when it knows every book lives under ".../catalogue/".
// - resolve_href: resolve an href against the page it was found on, the way
//   a browser would ("../x" climbs a directory, "/x" restarts at the root).
// =============================================================================

use url::Url;

/// Concatenates `base` and `path` with exactly one '/' between them.
///
/// No validation happens: a malformed path produces a malformed URL, which
/// will fail later when it is fetched.
///
/// Example:
///   absolute_url("http://example.com/", "/catalogue/x/index.html")
///   -> "http://example.com/catalogue/x/index.html"
pub fn absolute_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Resolves `href` against the URL of the page it appeared on.
///
/// Returns None when the page URL itself is not a valid URL or the href
/// cannot be joined onto it.
pub fn resolve_href(page_url: &str, href: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    base.join(href.trim()).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_single_slash() {
        assert_eq!(
            absolute_url("http://example.com/", "/catalogue/x/index.html"),
            "http://example.com/catalogue/x/index.html"
        );
        assert_eq!(
            absolute_url("http://example.com", "catalogue/x/index.html"),
            "http://example.com/catalogue/x/index.html"
        );
    }

    #[test]
    fn test_absolute_url_keeps_base_path() {
        assert_eq!(
            absolute_url("http://books.toscrape.com/catalogue/", "a-light-in-the-attic_1000/index.html"),
            "http://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html"
        );
    }

    #[test]
    fn test_absolute_url_empty_path() {
        assert_eq!(absolute_url("http://example.com/", ""), "http://example.com/");
    }

    #[test]
    fn test_resolve_relative_href() {
        assert_eq!(
            resolve_href("http://books.toscrape.com/catalogue/page-2.html", "../index.html"),
            Some("http://books.toscrape.com/index.html".to_string())
        );
        assert_eq!(
            resolve_href("http://quotes.toscrape.com/page/1/", "/author/Jane-Austen"),
            Some("http://quotes.toscrape.com/author/Jane-Austen".to_string())
        );
    }

    #[test]
    fn test_resolve_with_invalid_page_url() {
        assert_eq!(resolve_href("not a url", "/x"), None);
    }
}
