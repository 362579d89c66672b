// src/store/snapshot.rs
// =============================================================================
// Table snapshots: save a scraped table as JSON, reload it later with `show`.
//
// Scraping is slow and sites change, so the workshop keeps what it fetched.
// A snapshot is the Table itself serialized with serde. Loading rebuilds the
// table row by row, so a hand-edited file with a short or long row is rejected
// instead of surfacing later as an out-of-bounds cell.
// =============================================================================

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::ensure_parent;
use crate::table::Table;

/// Writes `table` to `path` as pretty JSON.
pub fn save_snapshot(table: &Table, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(table)?;
    fs::write(path, json).with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    Ok(())
}

/// Reads a table written by `save_snapshot`.
pub fn load_snapshot(path: &Path) -> Result<Table> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let raw: Table =
        serde_json::from_str(&json).with_context(|| format!("{} is not a table snapshot", path.display()))?;

    let mut table = Table::new(raw.columns);
    for (i, row) in raw.rows.into_iter().enumerate() {
        table
            .push_row(row)
            .with_context(|| format!("{}: row {} does not match the columns", path.display(), i + 1))?;
    }
    Ok(table)
}
