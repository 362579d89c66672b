// src/api/rest.rs
// =============================================================================
// REST call-and-decode.
//
// On a non-success status we log it and return Ok(None): "the API said no,
// there is no table". We don't retry and we don't treat it as a crash. If you
// hit a rate limit (HTTP 429), wait a bit and run the command again.
//
// A body that doesn't decode IS an error: the API answered 200 with something
// we didn't expect, and silently returning nothing would hide that.
// =============================================================================

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::fetch::{Fetcher, Request};
use crate::table::{flatten_records, JsonPath, Table};

/// GETs `request` and decodes the JSON body as `T`.
///
/// Returns:
///   Ok(Some(T)) on a 2xx answer that decodes
///   Ok(None)    on any other status (logged as a warning)
///   Err         on network failure or an undecodable body
pub async fn get_json<T: DeserializeOwned>(fetcher: &dyn Fetcher, request: &Request) -> Result<Option<T>> {
    let response = fetcher.fetch(request).await?;

    if !response.is_success() {
        warn!(status = response.status, url = %request.url, "API request failed");
        return Ok(None);
    }

    let decoded = serde_json::from_str(&response.body)
        .with_context(|| format!("Failed to decode JSON from {}", request.url))?;

    Ok(Some(decoded))
}

/// GETs `request` and flattens the records found at `path` into a Table.
///
/// This is the untyped version of the recipe, for APIs we don't have
/// structs for.
pub async fn get_table(fetcher: &dyn Fetcher, request: &Request, path: &JsonPath) -> Result<Option<Table>> {
    let value: Option<Value> = get_json(fetcher, request).await?;
    Ok(value.map(|v| flatten_records(&v, path)))
}
