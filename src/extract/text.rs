// src/extract/text.rs
// =============================================================================
// Text cleanup for scraped values.
//
// Element text comes back with the page's indentation and line breaks still
// in it. normalize_ws flattens that into one line. sanitize_filename turns a
// scraped title into a name that is safe to write to disk.
// =============================================================================

/// Collapses every run of whitespace (spaces, tabs, newlines) into one space
/// and trims both ends.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turns a title into something safe to use as a file name.
///
/// Letters and digits are kept, whitespace becomes a single '_', '-' and '_'
/// are kept, anything else is dropped. An empty result falls back to
/// `fallback`.
pub fn sanitize_filename(title: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_us = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_us = false;
        } else if ch.is_whitespace() || ch == '_' {
            if !last_us {
                out.push('_');
                last_us = true;
            }
        } else if ch == '-' {
            out.push(ch);
            last_us = false;
        }
    }

    let out = out.trim_matches('_').to_string();
    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}
