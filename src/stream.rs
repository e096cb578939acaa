//! Incremental decoding of a token-streamed dictionary response.
//!
//! The AI provider delivers its answer as server-sent-event chunks, so the
//! complete JSON document only exists once the stream closes. Rather than
//! parse JSON incrementally, the session keeps an accumulating text buffer:
//! every content delta is appended and the whole buffer is handed to a
//! partial-result callback for a best-effort render, and strict validation
//! happens exactly once, at close.

use crate::dictionary::DictionaryEntry;
use crate::error::{TranslateError, TranslateResult};

const DATA_MARKER: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Reassembles complete lines from chunks that may split a line anywhere.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every line completed by it. The trailing
    /// fragment, if any, stays buffered until the next chunk.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
        lines
    }

    pub fn has_remainder(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// One streaming lookup session: the accumulated raw buffer plus its
/// open/closed status. Created on the first chunk of a lookup, destroyed on
/// completion or error; sessions never share buffers.
#[derive(Debug, Default)]
pub struct LookupStream {
    lines: LineBuffer,
    buffer: String,
    closed: bool,
}

impl LookupStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded chunk.
    ///
    /// Lines carrying the `data: ` marker hold a JSON-encoded delta whose
    /// content is appended to the buffer; `data: [DONE]` closes the session;
    /// every other line is discarded. `on_partial` receives the full
    /// accumulated buffer after each delta that carried content, even though
    /// the buffer is usually not yet valid JSON.
    pub fn feed(&mut self, chunk: &str, on_partial: &mut dyn FnMut(&str)) {
        for line in self.lines.push(chunk) {
            self.accept_line(&line, on_partial);
        }
    }

    fn accept_line(&mut self, line: &str, on_partial: &mut dyn FnMut(&str)) {
        if self.closed {
            return;
        }
        let Some(data) = line.trim().strip_prefix(DATA_MARKER) else {
            return;
        };
        let data = data.trim();
        if data == DONE_SENTINEL {
            self.closed = true;
            return;
        }
        // Malformed deltas are skipped, not fatal: the model (or an
        // intermediary) may interleave garbage without killing the stream.
        let Ok(value) = serde_json::from_str::<serde_json::Value>(data) else {
            tracing::debug!(line = data, "skipping malformed stream line");
            return;
        };
        if let Some(content) = delta_content(&value) {
            self.buffer.push_str(content);
            on_partial(&self.buffer);
        }
    }

    /// Whether the end-of-stream sentinel has been seen.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The raw text accumulated so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Strict whole-buffer parse, allowed only after the sentinel.
    ///
    /// A transport that ends without ever sending `[DONE]` yields
    /// `MalformedResponse` without attempting a parse.
    pub fn finish(self) -> TranslateResult<DictionaryEntry> {
        if !self.closed {
            return Err(TranslateError::MalformedResponse(
                "stream ended without completion sentinel".to_string(),
            ));
        }
        serde_json::from_str(&self.buffer).map_err(|err| {
            TranslateError::MalformedResponse(format!(
                "final payload is not a dictionary entry: {}",
                err
            ))
        })
    }
}

/// Incremental content lives at `choices[*].delta.content` on the live wire;
/// a top-level `delta` string is accepted as the compact equivalent.
fn delta_content(value: &serde_json::Value) -> Option<&str> {
    if let Some(choices) = value.get("choices").and_then(|v| v.as_array()) {
        for choice in choices {
            if let Some(content) = choice.pointer("/delta/content").and_then(|v| v.as_str()) {
                return Some(content);
            }
        }
        return None;
    }
    value.get("delta").and_then(|v| v.as_str())
}
