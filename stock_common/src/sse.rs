//! Server-Sent Events framing.
//!
//! The server only ever emits anonymous `data:` frames, so encoding is a single
//! function. Decoding follows the event-stream parsing rules closely enough for
//! the client: `data` lines are accumulated and joined by `\n`, a blank line
//! dispatches the event, comment lines (leading `:`) and other fields are ignored.

/// Prefix of an SSE data line.
pub const DATA_PREFIX: &str = "data: ";

/// Wrap a payload into a single SSE data frame terminated by a blank line.
pub fn format_data_frame(payload: &str) -> String {
    format!("{DATA_PREFIX}{payload}\n\n")
}

/// Incremental, line-oriented decoder for an event stream body.
#[derive(Debug, Default)]
pub struct SseDecoder {
    data: Vec<String>,
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (with or without its line terminator).
    ///
    /// Returns the event data once a blank line completes an event that carried
    /// at least one `data` field.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);

        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            let event = self.data.join("\n");
            self.data.clear();
            return Some(event);
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }
}
