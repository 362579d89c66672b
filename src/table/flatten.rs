// src/table/flatten.rs
// =============================================================================
// Flattening: nested JSON records -> one flat Table.
//
// Given a response like
//
//   {"data": {"children": [{"kind": "t3", "data": {"title": "..", "score": 5}}]}}
//
// and the path "data.children", every child becomes one row. Nested objects
// are flattened one level into "parent.child" columns ("data.title",
// "data.score"). Deeper objects and arrays are kept as compact JSON text.
//
// Columns are the union of every record's keys in the order they were first
// seen, so rows with missing fields still line up (the cell is just empty).
// =============================================================================

use serde_json::{Map, Value};

use super::{JsonPath, Table};

/// Flattens the records found at `path` inside `value` into a Table.
///
/// If the path ends on an array, each element is a record. If it fans out
/// through nested arrays, the records of every branch are concatenated in
/// document order. Scalars become rows of a single "value" column.
pub fn flatten_records(value: &Value, path: &JsonPath) -> Table {
    let mut records: Vec<&Value> = Vec::new();
    for leaf in path.leaves(value) {
        match leaf {
            Value::Array(items) => records.extend(items.iter()),
            other => records.push(other),
        }
    }

    let flat: Vec<Vec<(String, String)>> = records.into_iter().map(flatten_one).collect();

    let mut columns: Vec<String> = Vec::new();
    for record in &flat {
        for (key, _) in record {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = flat
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| {
                    record
                        .iter()
                        .find(|(key, _)| key == column)
                        .map(|(_, cell)| cell.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    Table { columns, rows }
}

fn flatten_one(record: &Value) -> Vec<(String, String)> {
    match record {
        Value::Object(map) => {
            let mut cells = Vec::new();
            for (key, value) in map {
                match value {
                    Value::Object(inner) => push_nested(&mut cells, key, inner),
                    other => cells.push((key.clone(), cell_text(other))),
                }
            }
            cells
        }
        other => vec![("value".to_string(), cell_text(other))],
    }
}

fn push_nested(cells: &mut Vec<(String, String)>, prefix: &str, inner: &Map<String, Value>) {
    for (key, value) in inner {
        cells.push((format!("{}.{}", prefix, key), cell_text(value)));
    }
}

/// How one JSON value is written into a cell.
///
/// Strings lose their quotes, null becomes empty, everything else is its
/// compact JSON form.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
