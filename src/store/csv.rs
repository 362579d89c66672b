// src/store/csv.rs
// =============================================================================
// CSV export, so a table can be opened in a spreadsheet.
//
// The header row is the column list, then one line per row. Cells are quoted
// only when they need it (commas, quotes, line breaks). Output is UTF-8 with
// "\n" line endings.
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ensure_parent;
use crate::table::Table;

/// Quotes a cell if it contains a comma, quote or line break; inner quotes
/// are doubled.
fn csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn write_row<W: Write>(out: &mut W, cells: &[String]) -> std::io::Result<()> {
    let line: Vec<String> = cells.iter().map(|c| csv_cell(c)).collect();
    writeln!(out, "{}", line.join(","))
}

/// Header line, then one line per row.
pub fn to_csv_string(table: &Table) -> String {
    let mut buf: Vec<u8> = Vec::new();
    // Writing into a Vec can't fail.
    let _ = write_row(&mut buf, &table.columns);
    for row in &table.rows {
        let _ = write_row(&mut buf, row);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    write_row(&mut out, &table.columns)?;
    for row in &table.rows {
        write_row(&mut out, row)?;
    }
    out.flush()?;
    Ok(())
}
