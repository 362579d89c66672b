// src/sites/mod.rs
// =============================================================================
// The HTML segments of the workshop: scraping sites that have no API.
//
// - books: a paginated book catalogue, one request per book page
// - quotes: quotes with authors and tags, joined to author bio pages
//
// Both sites are practice sandboxes built for scraping (books.toscrape.com and
// quotes.toscrape.com), so the selectors here match their markup.
// =============================================================================

mod books;
mod quotes;

pub use books::{book_links, parse_book, scrape_books, BookRecord, Catalog};
pub use quotes::{
    author_urls, join_authors, parse_author, parse_quotes, scrape_authors, scrape_quotes,
    AuthorRecord, QuoteRecord, QUOTES_PAGE_TEMPLATE, TAG_DELIMITER,
};
