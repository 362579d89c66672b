// src/api/oxford.rs
// =============================================================================
// Looking words up in the Oxford Dictionaries API.
//
// Credentials are two headers, `app_id` and `app_key`.
//
// The response is deep. A single definition lives at:
//
//   results[0]                 one per headword/homograph
//     .lexicalEntries[0]       one per part of speech (noun, verb, ...)
//       .entries[0]            usually just one
//         .senses[0]           one per meaning
//           .definitions[0]    the text we want
//
// We keep the response as a serde_json::Value and walk it with JsonPath
// rather than modelling every level as a struct: we only read a handful of
// fields and the rest of the shape is large and changes between versions.
// =============================================================================

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::get_json;
use crate::fetch::{Fetcher, Request};
use crate::table::{JsonPath, Record};

pub const OXFORD_ENTRIES: &str = "https://od-api.oxforddictionaries.com/api/v2/entries";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OxfordCredentials {
    pub app_id: String,
    pub app_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub word: String,
    pub lexical_category: String,
    pub definition: String,
    pub example: String,
}

impl Record for Definition {
    const COLUMNS: &'static [&'static str] = &["word", "lexical_category", "definition", "example"];

    fn row(&self) -> Vec<String> {
        vec![
            self.word.clone(),
            self.lexical_category.clone(),
            self.definition.clone(),
            self.example.clone(),
        ]
    }
}

pub fn entry_request(credentials: &OxfordCredentials, language: &str, word: &str) -> Request {
    Request::get(format!("{}/{}/{}", OXFORD_ENTRIES, language, word.trim().to_lowercase()))
        .header("app_id", credentials.app_id.as_str())
        .header("app_key", credentials.app_key.as_str())
}

/// The raw entry JSON for `word`, or None if the API refused (404 for an
/// unknown word, 403 for bad credentials).
pub async fn lookup_entry(
    fetcher: &dyn Fetcher,
    credentials: &OxfordCredentials,
    language: &str,
    word: &str,
) -> Result<Option<Value>> {
    get_json(fetcher, &entry_request(credentials, language, word)).await
}

/// The very first definition, reached by always taking element 0.
pub fn first_definition(entry: &Value) -> Option<String> {
    JsonPath::from("results.0.lexicalEntries.0.entries.0.senses.0.definitions.0")
        .lookup(entry)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Every definition in the entry, one row each, in document order.
///
/// Subsenses are listed right after the sense they refine.
pub fn definitions(entry: &Value) -> Vec<Definition> {
    let mut out = Vec::new();

    for result in JsonPath::from("results").leaves(entry).into_iter().flat_map(elements) {
        let word = text_at(result, "word");

        for lexical in JsonPath::from("lexicalEntries").leaves(result).into_iter().flat_map(elements) {
            let category = text_at(lexical, "lexicalCategory.text");

            for sense in JsonPath::from("entries.senses").leaves(lexical).into_iter().flat_map(elements) {
                push_sense(&mut out, &word, &category, sense);

                for sub in JsonPath::from("subsenses").leaves(sense).into_iter().flat_map(elements) {
                    push_sense(&mut out, &word, &category, sub);
                }
            }
        }
    }

    out
}

fn push_sense(out: &mut Vec<Definition>, word: &str, category: &str, sense: &Value) {
    let example = text_at(sense, "examples.0.text");

    for definition in JsonPath::from("definitions").leaves(sense).into_iter().flat_map(elements) {
        if let Some(text) = definition.as_str() {
            out.push(Definition {
                word: word.to_string(),
                lexical_category: category.to_string(),
                definition: text.to_string(),
                example: example.clone(),
            });
        }
    }
}

/// An array leaf yields its elements, anything else yields itself.
fn elements(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn text_at(value: &Value, path: &str) -> String {
    JsonPath::from(path)
        .lookup(value)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
