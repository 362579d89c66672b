// src/table/traverse.rs
// =============================================================================
// Walking into deeply nested JSON.
//
// API responses often bury what we want several levels down. The dictionary
// API is the extreme case:
//
//   results[0].lexicalEntries[0].entries[0].senses[0].definitions[0]
//
// A JsonPath is that route written as steps. A numeric step picks one array
// element; a named step reads an object field. When a named step meets an
// array, it is applied to every element ("fan out"), which is how
// `leaves` collects every definition instead of just the first.
// =============================================================================

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    steps: Vec<Step>,
}

impl JsonPath {
    pub fn new(steps: Vec<Step>) -> Self {
        JsonPath { steps }
    }

    /// The empty path: the value itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The first value reached by following the path, if any.
    ///
    /// Example:
    ///   {"a": [{"b": 1}, {"b": 2}]} with "a.0.b" -> Some(1)
    ///   {"a": [{"b": 1}, {"b": 2}]} with "a.b"   -> Some(1) (first of the fan-out)
    pub fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.leaves(value).into_iter().next()
    }

    /// Every value reached by following the path, in document order.
    ///
    /// A leaf that is itself an array is returned as-is; use a trailing
    /// named step or `flatten_records` to look inside it.
    pub fn leaves<'v>(&self, value: &'v Value) -> Vec<&'v Value> {
        let mut current = vec![value];

        for step in &self.steps {
            let mut next = Vec::new();
            for v in current {
                descend(v, step, &mut next);
            }
            current = next;
        }

        current
    }
}

fn descend<'v>(value: &'v Value, step: &Step, out: &mut Vec<&'v Value>) {
    match (value, step) {
        (Value::Array(items), Step::Index(i)) => {
            if let Some(item) = items.get(*i) {
                out.push(item);
            }
        }
        (Value::Array(items), Step::Field(_)) => {
            for item in items {
                descend(item, step, out);
            }
        }
        (Value::Object(map), Step::Field(name)) => {
            if let Some(field) = map.get(name) {
                out.push(field);
            }
        }
        _ => {}
    }
}

impl FromStr for JsonPath {
    type Err = std::convert::Infallible;

    /// Parses a dotted path. Parts made only of digits are indexes.
    /// The empty string is the root path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let steps = s
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<usize>() {
                Ok(i) => Step::Index(i),
                Err(_) => Step::Field(part.to_string()),
            })
            .collect();
        Ok(JsonPath { steps })
    }
}

impl From<&str> for JsonPath {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(path) => path,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Field(name) => name.clone(),
                Step::Index(i) => i.to_string(),
            })
            .collect();
        write!(f, "{}", parts.join("."))
    }
}
