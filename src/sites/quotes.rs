// src/sites/quotes.rs
// =============================================================================
// Scraping quotes, then following each author's "(about)" link.
//
// A quote box on the page looks like:
//
//   <div class="quote">
//     <span class="text">“The world as we have created it…”</span>
//     <span>by <small class="author">Albert Einstein</small>
//       <a href="/author/Albert-Einstein">(about)</a></span>
//     <div class="tags"><a class="tag">change</a><a class="tag">world</a></div>
//   </div>
//
// Unlike the books segment we select the quote boxes first and then look
// inside each one. Selecting ".text" and ".author" across the whole page
// separately would misalign rows as soon as one box is missing a field.
// =============================================================================

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::extract::{element_text, resolve_href, select_first_text, selector};
use crate::fetch::Fetcher;
use crate::sweep::{map_urls, page_urls, paginated_sweep, BatchOutcome, FailurePolicy, Politeness};
use crate::table::{Record, Table};

pub const QUOTES_PAGE_TEMPLATE: &str = "http://quotes.toscrape.com/page/{page}/";

/// Tags are stored in one cell, joined with this.
pub const TAG_DELIMITER: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub text: String,
    pub author: String,
    pub tags: String,
    pub author_url: String,
}

impl Record for QuoteRecord {
    const COLUMNS: &'static [&'static str] = &["text", "author", "tags", "author_url"];

    fn row(&self) -> Vec<String> {
        vec![
            self.text.clone(),
            self.author.clone(),
            self.tags.clone(),
            self.author_url.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub author_url: String,
    pub name: String,
    pub born_date: String,
    pub born_location: String,
    pub bio: String,
}

impl Record for AuthorRecord {
    const COLUMNS: &'static [&'static str] = &["author_url", "name", "born_date", "born_location", "bio"];

    fn row(&self) -> Vec<String> {
        vec![
            self.author_url.clone(),
            self.name.clone(),
            self.born_date.clone(),
            self.born_location.clone(),
            self.bio.clone(),
        ]
    }
}

/// Every quote box on one page, in page order.
///
/// `page_url` is used to turn the relative author link into a full URL.
pub fn parse_quotes(page_url: &str, html: &str) -> Result<Vec<QuoteRecord>> {
    let document = Html::parse_document(html);
    let quote_sel = selector("div.quote")?;
    let text_sel = selector("span.text")?;
    let author_sel = selector("small.author")?;
    let link_sel = selector("span a[href]")?;
    let tag_sel = selector("a.tag")?;

    let quotes = document
        .select(&quote_sel)
        .map(|quote| {
            let text = first_text(quote, &text_sel)
                .trim_matches(|c: char| c == '“' || c == '”' || c == '"')
                .to_string();
            let author = first_text(quote, &author_sel);
            let tags: Vec<String> = quote.select(&tag_sel).map(element_text).collect();
            let author_url = quote
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_href(page_url, href))
                .unwrap_or_default();

            QuoteRecord {
                text,
                author,
                tags: tags.join(TAG_DELIMITER),
                author_url,
            }
        })
        .collect();

    Ok(quotes)
}

fn first_text(element: ElementRef<'_>, sel: &scraper::Selector) -> String {
    element.select(sel).next().map(element_text).unwrap_or_default()
}

/// Reads one author page.
pub fn parse_author(url: &str, html: &str) -> Result<AuthorRecord> {
    let name = select_first_text(html, "h3.author-title")?
        .ok_or_else(|| anyhow!("No author name found on {}", url))?;

    let born_date = select_first_text(html, "span.author-born-date")?.unwrap_or_default();
    let born_location = select_first_text(html, "span.author-born-location")?
        .map(|loc| loc.trim_start_matches("in ").to_string())
        .unwrap_or_default();
    let bio = select_first_text(html, "div.author-description")?.unwrap_or_default();

    Ok(AuthorRecord {
        author_url: url.to_string(),
        name,
        born_date,
        born_location,
        bio,
    })
}

/// Sweeps `pages` quote pages built from `template`.
pub async fn scrape_quotes(
    fetcher: &dyn Fetcher,
    template: &str,
    pages: u32,
    politeness: Politeness,
) -> Result<Vec<QuoteRecord>> {
    let urls = page_urls(template, pages);
    paginated_sweep(fetcher, &urls, politeness, parse_quotes).await
}

/// Distinct author links, in the order the quotes mention them.
pub fn author_urls(quotes: &[QuoteRecord]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for quote in quotes {
        if !quote.author_url.is_empty() && !urls.contains(&quote.author_url) {
            urls.push(quote.author_url.clone());
        }
    }
    urls
}

/// Visits each distinct author page once. A broken author link is skipped
/// so one bad page doesn't cost us every other bio.
pub async fn scrape_authors(
    fetcher: &dyn Fetcher,
    quotes: &[QuoteRecord],
    politeness: Politeness,
) -> Result<BatchOutcome<AuthorRecord>> {
    let urls = author_urls(quotes);
    map_urls(fetcher, &urls, politeness, FailurePolicy::Skip, parse_author).await
}

/// One row per quote with the author's bio columns appended (empty when the
/// author page could not be read).
pub fn join_authors(quotes: &[QuoteRecord], authors: &[AuthorRecord]) -> Result<Table> {
    Table::from_records(quotes).left_join(&Table::from_records(authors), "author_url", "author_url")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="quote">
          <span class="text">“The world as we have created it is a process of our thinking.”</span>
          <span>by <small class="author">Albert Einstein</small>
            <a href="/author/Albert-Einstein">(about)</a></span>
          <div class="tags">Tags: <a class="tag" href="/tag/change/">change</a>
            <a class="tag" href="/tag/deep-thoughts/">deep-thoughts</a></div>
        </div>
        <div class="quote">
          <span class="text">“A day without sunshine is like, you know, night.”</span>
          <span>by <small class="author">Steve Martin</small></span>
          <div class="tags"></div>
        </div>
    "#;

    const AUTHOR: &str = r#"
        <h3 class="author-title">Albert Einstein
        </h3>
        <p><strong>Born:</strong> <span class="author-born-date">March 14, 1879</span>
           <span class="author-born-location">in Ulm, Germany</span></p>
        <div class="author-description">
            In 1879, Albert Einstein was born in Ulm, Germany.
        </div>
    "#;

    #[test]
    fn test_parse_quotes() {
        let quotes = parse_quotes("http://quotes.toscrape.com/page/1/", PAGE).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text, "The world as we have created it is a process of our thinking.");
        assert_eq!(quotes[0].author, "Albert Einstein");
        assert_eq!(quotes[0].tags, "change, deep-thoughts");
        assert_eq!(quotes[0].author_url, "http://quotes.toscrape.com/author/Albert-Einstein");

        // Missing fields stay empty instead of shifting rows.
        assert_eq!(quotes[1].tags, "");
        assert_eq!(quotes[1].author_url, "");
    }

    #[test]
    fn test_parse_author() {
        let author = parse_author("http://quotes.toscrape.com/author/Albert-Einstein", AUTHOR).unwrap();
        assert_eq!(author.name, "Albert Einstein");
        assert_eq!(author.born_date, "March 14, 1879");
        assert_eq!(author.born_location, "Ulm, Germany");
        assert_eq!(author.bio, "In 1879, Albert Einstein was born in Ulm, Germany.");
    }

    #[test]
    fn test_author_urls_are_distinct() {
        let mut quotes = parse_quotes("http://quotes.toscrape.com/page/1/", PAGE).unwrap();
        quotes.push(quotes[0].clone());
        assert_eq!(author_urls(&quotes), vec!["http://quotes.toscrape.com/author/Albert-Einstein"]);
    }

    #[test]
    fn test_join_authors() {
        let quotes = parse_quotes("http://quotes.toscrape.com/page/1/", PAGE).unwrap();
        let author = parse_author("http://quotes.toscrape.com/author/Albert-Einstein", AUTHOR).unwrap();

        let table = join_authors(&quotes, &[author]).unwrap();
        assert_eq!(
            table.columns,
            vec!["text", "author", "tags", "author_url", "name", "born_date", "born_location", "bio"]
        );
        assert_eq!(table.column("born_date").unwrap(), vec!["March 14, 1879", ""]);
    }
}
