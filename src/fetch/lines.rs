// src/fetch/lines.rs
// =============================================================================
// Splits a stream of byte chunks into text lines.
//
// A streaming HTTP body arrives in arbitrary chunks: one chunk may hold three
// lines, or half of one. We buffer bytes until a '\n' shows up, then emit the
// complete line. Blank lines (keep-alive heartbeats) are dropped.
// =============================================================================

use anyhow::Result;
use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;

struct LineState<S> {
    chunks: S,
    buffer: Vec<u8>,
    ready: VecDeque<String>,
    done: bool,
}

/// Turns `chunks` into a stream of trimmed, non-empty lines.
///
/// An error from the underlying stream is passed through once and ends the
/// line stream. Whatever is left in the buffer when the chunks run out is
/// emitted as a final line.
pub fn split_lines<S>(chunks: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = Result<Vec<u8>>> + Unpin,
{
    let state = LineState {
        chunks,
        buffer: Vec::new(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(line) = state.ready.pop_front() {
                return Some((Ok(line), state));
            }
            if state.done {
                return None;
            }

            match state.chunks.next().await {
                Some(Ok(bytes)) => {
                    state.buffer.extend_from_slice(&bytes);
                    while let Some(pos) = state.buffer.iter().position(|b| *b == b'\n') {
                        let raw: Vec<u8> = state.buffer.drain(..=pos).collect();
                        push_line(&mut state.ready, &raw);
                    }
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.done = true;
                    let rest = std::mem::take(&mut state.buffer);
                    push_line(&mut state.ready, &rest);
                }
            }
        }
    })
}

fn push_line(ready: &mut VecDeque<String>, raw: &[u8]) {
    let line = String::from_utf8_lossy(raw).trim().to_string();
    if !line.is_empty() {
        ready.push_back(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn chunks(parts: Vec<&str>) -> impl Stream<Item = Result<Vec<u8>>> + Unpin {
        stream::iter(parts.into_iter().map(|p| Ok(p.as_bytes().to_vec())).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let lines: Vec<String> = split_lines(chunks(vec!["{\"a\":", "1}\r\n{\"b\"", ":2}\n"]))
            .map(|l| l.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[tokio::test]
    async fn test_heartbeats_are_dropped() {
        let lines: Vec<String> = split_lines(chunks(vec!["\r\n", "one\n\r\n", "two"]))
            .map(|l| l.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let parts: Vec<Result<Vec<u8>>> = vec![
            Ok(b"first\n".to_vec()),
            Err(anyhow!("connection reset")),
            Ok(b"never\n".to_vec()),
        ];
        let items: Vec<Result<String>> = split_lines(stream::iter(parts)).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "first");
        assert!(items[1].is_err());
    }
}
