// src/store/files.rs
// =============================================================================
// One plain-text file per record.
//
// The books segment saves every description as "<title>.txt". Titles are
// full of characters that aren't allowed (or are dangerous) in file names,
// so they go through sanitize_filename first. Two books with the same
// sanitized title get "_2", "_3", ... appended instead of overwriting.
// =============================================================================

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::extract::sanitize_filename;

/// Writes each `(title, body)` pair to `<dir>/<sanitized title>.txt`.
///
/// Returns the paths written, in input order.
pub fn write_text_files<'a, I>(dir: &Path, items: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut used: HashSet<String> = HashSet::new();
    let mut written = Vec::new();

    for (i, (title, body)) in items.into_iter().enumerate() {
        let stem = sanitize_filename(title, &format!("item_{}", i + 1));

        let mut name = stem.clone();
        let mut n = 1;
        while used.contains(&name) {
            n += 1;
            name = format!("{}_{}", stem, n);
        }
        used.insert(name.clone());

        let path = dir.join(format!("{}.txt", name));
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}
