// src/api/mod.rs
// =============================================================================
// The REST segments of the workshop.
//
// Every API here follows the same recipe (see rest.rs):
// 1. Build a GET with query parameters and/or credential headers
// 2. Check the status code; on failure report it and stop
// 3. Decode the JSON body into typed structs
// 4. Turn those into flat records for a Table
//
// Submodules, one per service:
// - reddit: subreddit listings (no auth)
// - guardian: news search (API key in the query string)
// - oxford: dictionary entries (app id + app key headers)
// - yelp: business search and reviews (bearer key), plus page scraping
// - twitter: recent search and a timed live stream (bearer token)
// =============================================================================

pub mod guardian;
pub mod oxford;
pub mod reddit;
mod rest;
pub mod twitter;
pub mod yelp;

pub use rest::{get_json, get_table};
