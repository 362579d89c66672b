// src/store/mod.rs
// =============================================================================
// Getting tables out of memory and onto disk.
//
// - snapshot: save a Table as JSON and load it back next session, so you
//   don't have to re-scrape 1000 pages to keep working on the data
// - csv: a plain CSV export for spreadsheets
// - files: one text file per record, named after its title
// =============================================================================

mod csv;
mod files;
mod snapshot;

pub use csv::{to_csv_string, write_csv};
pub use files::write_text_files;
pub use snapshot::{load_snapshot, save_snapshot};

use anyhow::{Context, Result};
use std::path::Path;

/// Creates the parent directory of `path` if it has one and it's missing.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}
