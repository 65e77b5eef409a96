//! Server-sent event framing.
//!
//! Bytes arrive in arbitrary chunks. Lines are split on `\n` (a trailing
//! `\r` is dropped), `data:` lines accumulate until a blank line closes the
//! event, and `event:`, `id:`, `retry:` and comment lines are ignored since
//! the event type travels inside the JSON payload.

/// A complete event pulled out of the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    Data(String),
    /// The `[DONE]` sentinel.
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.process_line(&line[..line.len() - 1], &mut frames);
        }
        frames
    }

    /// Flush whatever is left once the connection closes.
    pub fn finish(&mut self) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.process_line(&line, &mut frames);
        }
        self.dispatch(&mut frames);
        frames
    }

    fn process_line(&mut self, raw: &[u8], frames: &mut Vec<SseFrame>) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);

        if line.is_empty() {
            self.dispatch(frames);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (&*line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
    }

    fn dispatch(&mut self, frames: &mut Vec<SseFrame>) {
        if self.data.is_empty() {
            return;
        }
        let payload = std::mem::take(&mut self.data).join("\n");
        if payload.trim() == "[DONE]" {
            frames.push(SseFrame::Done);
        } else {
            frames.push(SseFrame::Data(payload));
        }
    }
}
