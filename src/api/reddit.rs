// src/api/reddit.rs
// =============================================================================
// Reading a subreddit.
//
// Reddit serves any listing page as JSON if you add ".json" to the path:
//   https://www.reddit.com/r/rust/top.json?limit=25&t=week
// Reading needs no credentials, only a descriptive User-Agent (the fetcher
// always sends one).
//
// The response wraps every post twice: data.children[].data is the post.
// =============================================================================

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::get_json;
use crate::fetch::{Fetcher, Request};
use crate::table::Record;

pub const REDDIT_BASE: &str = "https://www.reddit.com";

/// Which listing of the subreddit to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Sort {
    Hot,
    New,
    Top,
    Rising,
}

impl Sort {
    fn as_path(&self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Top => "top",
            Sort::Rising => "rising",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub subreddit: String,
    pub sort: Sort,
    pub limit: u32,
    /// Time window for `top`: hour, day, week, month, year or all.
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
}

impl Record for RedditPost {
    const COLUMNS: &'static [&'static str] =
        &["id", "title", "author", "score", "num_comments", "created_utc", "url", "permalink"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.author.clone(),
            self.score.to_string(),
            self.num_comments.to_string(),
            self.created_utc.to_string(),
            self.url.clone(),
            self.permalink.clone(),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

pub fn listing_request(query: &ListingQuery) -> Request {
    let url = format!(
        "{}/r/{}/{}.json",
        REDDIT_BASE,
        query.subreddit.trim_start_matches("r/"),
        query.sort.as_path()
    );

    Request::get(url)
        .query("limit", query.limit)
        .query_opt("t", query.time.as_deref())
}

/// The posts of one listing page, in Reddit's order.
pub async fn fetch_posts(fetcher: &dyn Fetcher, query: &ListingQuery) -> Result<Option<Vec<RedditPost>>> {
    let listing: Option<Listing> = get_json(fetcher, &listing_request(query)).await?;
    Ok(listing.map(|l| l.data.children.into_iter().map(|c| c.data).collect()))
}
