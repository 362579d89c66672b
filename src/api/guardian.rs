// src/api/guardian.rs
// =============================================================================
// Searching The Guardian's content API.
//
// The API key travels in the query string ("api-key=..."), which means it
// ends up in logs and shell history if you're not careful. We only log the
// endpoint, never the full URL.
//
// Results are paged: `page-size` items per page, `page` picks which one.
// =============================================================================

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::get_json;
use crate::fetch::{Fetcher, Request};
use crate::sweep::Politeness;
use crate::table::Record;

pub const GUARDIAN_SEARCH: &str = "https://content.guardianapis.com/search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page_size: u32,
    pub section: Option<String>,
    /// YYYY-MM-DD
    pub from_date: Option<String>,
    /// newest, oldest or relevance
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub web_title: String,
    pub web_url: String,
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub web_publication_date: String,
}

impl Record for Article {
    const COLUMNS: &'static [&'static str] = &["id", "title", "section", "published", "url"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.web_title.clone(),
            self.section_name.clone(),
            self.web_publication_date.clone(),
            self.web_url.clone(),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    pages: u32,
    #[serde(default)]
    results: Vec<Article>,
}

pub fn search_request(api_key: &str, query: &SearchQuery, page: u32) -> Request {
    Request::get(GUARDIAN_SEARCH)
        .query("q", &query.query)
        .query("page-size", query.page_size)
        .query("page", page)
        .query_opt("section", query.section.as_deref())
        .query_opt("from-date", query.from_date.as_deref())
        .query_opt("order-by", query.order_by.as_deref())
        .query("api-key", api_key)
}

/// Fetches up to `pages` pages of results and concatenates them.
///
/// Returns None if the first page fails. A later page that fails, comes back
/// empty, or lies past the last page the API reports ends the sweep early
/// with what we have.
pub async fn search(
    fetcher: &dyn Fetcher,
    api_key: &str,
    query: &SearchQuery,
    pages: u32,
    politeness: Politeness,
) -> Result<Option<Vec<Article>>> {
    let mut articles = Vec::new();

    for page in 1..=pages {
        if page > 1 {
            politeness.pause().await;
        }

        let envelope: Option<Envelope> = get_json(fetcher, &search_request(api_key, query, page)).await?;
        let response = match envelope {
            Some(e) => e.response,
            None if page == 1 => return Ok(None),
            None => break,
        };

        info!(page, results = response.results.len(), "guardian page");
        // pages == 0 means the payload didn't say.
        let last_page = response.pages > 0 && page >= response.pages;
        let done = response.results.is_empty() || last_page;
        articles.extend(response.results);

        if done {
            break;
        }
    }

    Ok(Some(articles))
}
