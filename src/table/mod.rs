// src/table/mod.rs
// =============================================================================
// The in-memory table every segment ends with.
//
// A Table is a list of column names plus rows of string cells. It is the
// common currency between scraping (records), JSON flattening, and the
// writers in `store`. Keeping cells as strings matches what we scrape: text.
//
// Submodules:
// - traverse: walk a JSON value along a path like "results.0.senses"
// - flatten: turn a list of JSON records into a Table
// =============================================================================

mod flatten;
mod traverse;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use flatten::{cell_text, flatten_records};
pub use traverse::{JsonPath, Step};

/// A typed record that knows how to become one table row.
pub trait Record {
    const COLUMNS: &'static [&'static str];

    /// Cells in the same order as `COLUMNS`.
    fn row(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// One row per record, in order.
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        Table {
            columns: R::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: records.iter().map(Record::row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row; it must have one cell per column.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(anyhow!(
                "Row has {} cells but the table has {} columns",
                row.len(),
                self.columns.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| anyhow!("No column named '{}' (have: {})", name, self.columns.join(", ")))
    }

    /// Every cell of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Keeps the rows whose `column` cell satisfies `keep`.
    pub fn filter<P>(&self, column: &str, keep: P) -> Result<Table>
    where
        P: Fn(&str) -> bool,
    {
        let idx = self.column_index(column)?;
        Ok(Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(&row[idx])).cloned().collect(),
        })
    }

    /// Left join: every row of `self`, extended with the columns of the
    /// first `right` row whose `right_key` equals this row's `left_key`.
    ///
    /// Unmatched rows get empty cells. The right key column is not repeated.
    pub fn left_join(&self, right: &Table, left_key: &str, right_key: &str) -> Result<Table> {
        let left_idx = self.column_index(left_key)?;
        let right_idx = right.column_index(right_key)?;

        let mut lookup: HashMap<&str, &Vec<String>> = HashMap::new();
        for row in &right.rows {
            lookup.entry(row[right_idx].as_str()).or_insert(row);
        }

        let mut columns = self.columns.clone();
        columns.extend(
            right
                .columns
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != right_idx)
                .map(|(_, c)| c.clone()),
        );

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut joined = row.clone();
                match lookup.get(row[left_idx].as_str()) {
                    Some(other) => joined.extend(
                        other
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != right_idx)
                            .map(|(_, cell)| cell.clone()),
                    ),
                    None => joined.extend(std::iter::repeat(String::new()).take(right.columns.len() - 1)),
                }
                joined
            })
            .collect();

        Ok(Table { columns, rows })
    }

    /// Counts how often each value appears in `column`, most frequent first
    /// (ties broken alphabetically).
    ///
    /// With a delimiter, each cell is split first, so a "tags" cell like
    /// "love, life" counts once for "love" and once for "life". Empty values
    /// are not counted.
    pub fn value_counts(&self, column: &str, delimiter: Option<&str>) -> Result<Vec<(String, usize)>> {
        let idx = self.column_index(column)?;
        let mut counts: HashMap<String, usize> = HashMap::new();

        for row in &self.rows {
            let cell = row[idx].as_str();
            let values: Vec<&str> = match delimiter {
                Some(d) => cell.split(d).map(str::trim).collect(),
                None => vec![cell.trim()],
            };
            for value in values.into_iter().filter(|v| !v.is_empty()) {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }

    /// Appends the rows of `other`, which must have the same columns.
    pub fn concat(&mut self, other: Table) -> Result<()> {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return Ok(());
        }
        if self.columns != other.columns {
            return Err(anyhow!(
                "Cannot concatenate tables with different columns: [{}] vs [{}]",
                self.columns.join(", "),
                other.columns.join(", ")
            ));
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quote {
        text: &'static str,
        author: &'static str,
        tags: &'static str,
    }

    impl Record for Quote {
        const COLUMNS: &'static [&'static str] = &["text", "author", "tags"];

        fn row(&self) -> Vec<String> {
            vec![self.text.into(), self.author.into(), self.tags.into()]
        }
    }

    fn quotes() -> Table {
        Table::from_records(&[
            Quote { text: "q1", author: "Austen", tags: "love, life" },
            Quote { text: "q2", author: "Einstein", tags: "life" },
            Quote { text: "q3", author: "Austen", tags: "" },
        ])
    }

    #[test]
    fn test_from_records() {
        let table = quotes();
        assert_eq!(table.columns, vec!["text", "author", "tags"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("author").unwrap(), vec!["Austen", "Einstein", "Austen"]);
    }

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        assert!(table.push_row(vec!["1".into()]).is_err());
        assert!(table.push_row(vec!["1".into(), "2".into()]).is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_filter() {
        let austen = quotes().filter("author", |a| a == "Austen").unwrap();
        assert_eq!(austen.column("text").unwrap(), vec!["q1", "q3"]);
        assert!(quotes().filter("nope", |_| true).is_err());
    }

    #[test]
    fn test_left_join() {
        let mut authors = Table::new(vec!["name".into(), "born".into()]);
        authors.push_row(vec!["Austen".into(), "1775".into()]).unwrap();

        let joined = quotes().left_join(&authors, "author", "name").unwrap();
        assert_eq!(joined.columns, vec!["text", "author", "tags", "born"]);
        assert_eq!(joined.column("born").unwrap(), vec!["1775", "", "1775"]);
    }

    #[test]
    fn test_value_counts_with_delimiter() {
        let counts = quotes().value_counts("tags", Some(",")).unwrap();
        assert_eq!(counts, vec![("life".to_string(), 2), ("love".to_string(), 1)]);

        let authors = quotes().value_counts("author", None).unwrap();
        assert_eq!(authors[0], ("Austen".to_string(), 2));
    }

    #[test]
    fn test_concat() {
        let mut all = Table::default();
        all.concat(quotes()).unwrap();
        all.concat(quotes()).unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.concat(Table::new(vec!["x".into()])).is_err());
    }
}
