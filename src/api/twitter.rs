// src/api/twitter.rs
// =============================================================================
// Tweets: a one-shot recent search, and a timed listen on the live stream.
//
// Both use the v2 API with an app bearer token. A tweet on the wire only
// carries ids for its author and place; the readable screen name, profile
// location and place name come back in a separate "includes" section that
// we join in by id.
//
// The stream never ends on its own. We read it line by line (one JSON tweet
// per line) until our timer runs out or we have enough tweets, then drop the
// connection. Stopping early is just Ctrl-C.
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::get_json;
use crate::fetch::{Fetcher, HttpFetcher, Request};
use crate::table::Record;

pub const TWITTER_API: &str = "https://api.twitter.com/2";

const TWEET_FIELDS: &str = "created_at,geo,author_id";
const EXPANSIONS: &str = "author_id,geo.place_id";
const USER_FIELDS: &str = "username,location";
const PLACE_FIELDS: &str = "full_name,geo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub screen_name: String,
    pub created_at: String,
    pub text: String,
    /// The tagged place if there is one, otherwise the author's profile location.
    pub location: String,
    /// (latitude, longitude) when the tweet carries an exact point.
    pub coordinates: Option<(f64, f64)>,
}

impl Record for Tweet {
    const COLUMNS: &'static [&'static str] = &["id", "screen_name", "created_at", "text", "location", "coordinates"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.screen_name.clone(),
            self.created_at.clone(),
            self.text.clone(),
            self.location.clone(),
            self.coordinates
                .map(|(lat, lon)| format!("{},{}", lat, lon))
                .unwrap_or_default(),
        ]
    }
}

// --- Wire shapes -------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Vec<TweetJson>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Deserialize)]
struct StreamEnvelope {
    data: Option<TweetJson>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Deserialize)]
struct TweetJson {
    id: String,
    text: String,
    #[serde(default)]
    created_at: String,
    author_id: Option<String>,
    geo: Option<Geo>,
}

#[derive(Debug, Deserialize)]
struct Geo {
    place_id: Option<String>,
    coordinates: Option<Point>,
}

#[derive(Debug, Deserialize)]
struct Point {
    /// GeoJSON order: [longitude, latitude]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Place {
    id: String,
    full_name: String,
}

fn to_tweet(raw: TweetJson, includes: &Includes) -> Tweet {
    let user = raw
        .author_id
        .as_deref()
        .and_then(|id| includes.users.iter().find(|u| u.id == id));

    let place = raw
        .geo
        .as_ref()
        .and_then(|g| g.place_id.as_deref())
        .and_then(|id| includes.places.iter().find(|p| p.id == id));

    let coordinates = raw
        .geo
        .as_ref()
        .and_then(|g| g.coordinates.as_ref())
        .and_then(|p| match p.coordinates.as_slice() {
            [lon, lat] => Some((*lat, *lon)),
            _ => None,
        });

    let location = match (place, user) {
        (Some(place), _) => place.full_name.clone(),
        (None, Some(user)) => user.location.clone().unwrap_or_default(),
        (None, None) => String::new(),
    };

    Tweet {
        id: raw.id,
        screen_name: user.map(|u| u.username.clone()).unwrap_or_default(),
        created_at: raw.created_at,
        text: raw.text,
        location,
        coordinates,
    }
}

fn with_fields(request: Request) -> Request {
    request
        .query("tweet.fields", TWEET_FIELDS)
        .query("expansions", EXPANSIONS)
        .query("user.fields", USER_FIELDS)
        .query("place.fields", PLACE_FIELDS)
}

// --- Recent search -------------------------------------------------------------

/// `max_results` must be between 10 and 100; the API rejects anything else.
pub fn search_request(bearer_token: &str, query: &str, max_results: u32) -> Request {
    with_fields(
        Request::get(format!("{}/tweets/search/recent", TWITTER_API))
            .query("query", query)
            .query("max_results", max_results.clamp(10, 100)),
    )
    .bearer(bearer_token)
}

pub async fn search_recent(
    fetcher: &dyn Fetcher,
    bearer_token: &str,
    query: &str,
    max_results: u32,
) -> Result<Option<Vec<Tweet>>> {
    let envelope: Option<SearchEnvelope> =
        get_json(fetcher, &search_request(bearer_token, query, max_results)).await?;

    Ok(envelope.map(|e| {
        let includes = e.includes;
        e.data.into_iter().map(|t| to_tweet(t, &includes)).collect()
    }))
}

// --- Live stream -----------------------------------------------------------------

/// The sampled firehose: roughly 1% of all public tweets, no rules needed.
pub fn stream_request(bearer_token: &str) -> Request {
    with_fields(Request::get(format!("{}/tweets/sample/stream", TWITTER_API))).bearer(bearer_token)
}

/// Parses one stream line. Lines without a tweet (operational messages,
/// errors about individual tweets) are None.
pub fn parse_stream_line(line: &str) -> Result<Option<Tweet>> {
    let envelope: StreamEnvelope =
        serde_json::from_str(line).with_context(|| format!("Bad stream line: {}", line))?;

    match envelope.data {
        Some(raw) => Ok(Some(to_tweet(raw, &envelope.includes))),
        None => {
            debug!(line, "stream message without tweet");
            Ok(None)
        }
    }
}

/// Reads tweets from `lines` until `duration` has passed, `limit` tweets
/// have arrived, or the stream ends, whichever happens first.
///
/// A line that doesn't decode is skipped. A transport error ends the listen
/// early with the tweets collected so far.
pub async fn collect_for<S>(mut lines: S, duration: Duration, limit: Option<usize>) -> Result<Vec<Tweet>>
where
    S: Stream<Item = Result<String>> + Unpin,
{
    let deadline = tokio::time::Instant::now() + duration;
    let mut tweets = Vec::new();

    loop {
        if limit.map_or(false, |l| tweets.len() >= l) {
            break;
        }

        match tokio::time::timeout_at(deadline, lines.next()).await {
            // Timer expired.
            Err(_) => break,
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                warn!(error = %e, kept = tweets.len(), "stream dropped, keeping what arrived");
                break;
            }
            Ok(Some(Ok(line))) => match parse_stream_line(&line) {
                Ok(Some(tweet)) => tweets.push(tweet),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "skipping stream line"),
            },
        }
    }

    info!(tweets = tweets.len(), "stream closed");
    Ok(tweets)
}

/// Opens the live stream and listens for `duration`.
pub async fn stream_tweets(
    http: &HttpFetcher,
    bearer_token: &str,
    duration: Duration,
    limit: Option<usize>,
) -> Result<Vec<Tweet>> {
    let lines = http.stream_lines(&stream_request(bearer_token)).await?;
    collect_for(lines, duration, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use futures::stream;
    use serde_json::json;

    fn stream_line(id: &str) -> String {
        json!({
            "data": { "id": id, "text": format!("tweet {}", id), "created_at": "2024-05-01T12:00:00.000Z", "author_id": "u1" },
            "includes": { "users": [{ "id": "u1", "username": "ferris", "location": "Berlin" }] }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_search_recent_joins_includes() {
        let url = search_request("T", "#rustlang", 10).full_url().unwrap();
        let fetcher = MemoryFetcher::new().json(
            &url,
            &json!({
                "data": [
                    { "id": "1", "text": "hello", "created_at": "2024-05-01T12:00:00.000Z", "author_id": "u1",
                      "geo": { "place_id": "p1", "coordinates": { "type": "Point", "coordinates": [-0.1276, 51.5072] } } },
                    { "id": "2", "text": "no author info", "author_id": "u9" }
                ],
                "includes": {
                    "users": [{ "id": "u1", "username": "ferris", "location": "Berlin" }],
                    "places": [{ "id": "p1", "full_name": "London, England" }]
                },
                "meta": { "result_count": 2 }
            }),
        );

        let tweets = search_recent(&fetcher, "T", "#rustlang", 10).await.unwrap().unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0].screen_name, "ferris");
        assert_eq!(tweets[0].location, "London, England");
        assert_eq!(tweets[0].coordinates, Some((51.5072, -0.1276)));
        assert_eq!(tweets[1].screen_name, "");
        assert_eq!(tweets[1].location, "");
    }

    #[test]
    fn test_max_results_is_clamped() {
        let request = search_request("T", "rust", 500);
        assert!(request.query.contains(&("max_results".to_string(), "100".to_string())));
    }

    #[test]
    fn test_parse_stream_line() {
        let tweet = parse_stream_line(&stream_line("7")).unwrap().unwrap();
        assert_eq!(tweet.id, "7");
        assert_eq!(tweet.location, "Berlin");

        let error_only = r#"{"errors":[{"title":"operational-disconnect"}]}"#;
        assert_eq!(parse_stream_line(error_only).unwrap(), None);
        assert!(parse_stream_line("not json").is_err());
    }

    #[tokio::test]
    async fn test_collect_stops_at_limit() {
        let lines = stream::iter((1..=5).map(|i| Ok(stream_line(&i.to_string()))).collect::<Vec<_>>());
        let tweets = collect_for(lines, Duration::from_secs(5), Some(3)).await.unwrap();
        let ids: Vec<&str> = tweets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_collect_skips_undecodable_line() {
        let lines = stream::iter(vec![
            Ok(stream_line("1")),
            Ok(stream_line("2")),
            Ok("{truncated".to_string()),
            Ok(stream_line("3")),
        ]);
        let tweets = collect_for(lines, Duration::from_secs(5), None).await.unwrap();
        let ids: Vec<&str> = tweets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_collect_keeps_tweets_when_connection_drops() {
        let lines = stream::iter(vec![
            Ok(stream_line("1")),
            Ok(stream_line("2")),
            Err(anyhow::anyhow!("connection reset")),
            Ok(stream_line("3")),
        ]);
        let tweets = collect_for(lines, Duration::from_secs(5), None).await.unwrap();
        let ids: Vec<&str> = tweets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_collect_stops_when_timer_expires() {
        // One tweet, then a stream that never yields again.
        let lines = stream::iter(vec![Ok(stream_line("1"))]).chain(stream::pending());
        let tweets = collect_for(lines, Duration::from_millis(50), None).await.unwrap();
        assert_eq!(tweets.len(), 1);
    }
}
