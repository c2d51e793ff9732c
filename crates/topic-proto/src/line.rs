//! Line-based codec for tokio.
//!
//! Reads and writes newline-terminated lines. Line endings are stripped on
//! decode and a single `\n` is appended on encode. A received line that is
//! over the limit is dropped and decoding resumes at the next line; bytes that
//! are not UTF-8 are replaced with U+FFFD. Neither ends the stream.

use std::borrow::Cow;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error::{self, ProtocolError};
use crate::transport::MAX_LINE_LEN;

/// Line-based codec that handles newline-terminated messages.
///
/// By default, lines are limited to [`MAX_LINE_LEN`] bytes, excluding the
/// line ending, in both directions.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Inside an oversized line; everything up to the next `\n` is dropped
    discarding: bool,
}

impl LineCodec {
    /// Create a new codec with the default max line length.
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Maximum accepted line length in bytes.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Sanitize outgoing line data.
    ///
    /// Truncates at the first line ending so a single logical message can
    /// never be split into two wire lines.
    pub fn sanitize(mut data: String) -> String {
        if let Some(pos) = data.find(&['\r', '\n'][..]) {
            data.truncate(pos);
        }
        data
    }

    /// Decode one complete line. `None` if it is over the limit.
    fn finish_line(&self, raw: &[u8]) -> Option<String> {
        let body = strip_line_ending(raw);
        if body.len() > self.max_len {
            warn!(
                len = body.len(),
                limit = self.max_len,
                "dropping oversized line"
            );
            return None;
        }

        let text = String::from_utf8_lossy(body);
        if let Cow::Owned(_) = text {
            warn!(len = body.len(), "replaced invalid UTF-8 in line");
        }
        Some(text.into_owned())
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_line_ending(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            // Look for newline starting from where we left off
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if self.discarding {
                    src.clear();
                    self.next_index = 0;
                } else if src.len() > self.max_len + 2 {
                    // Partial line already over the limit (+2 leaves room for "\r\n")
                    warn!(
                        buffered = src.len(),
                        limit = self.max_len,
                        "dropping oversized line"
                    );
                    self.discarding = true;
                    src.clear();
                    self.next_index = 0;
                } else {
                    // No complete line yet - remember where we stopped
                    self.next_index = src.len();
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if let Some(text) = self.finish_line(&line) {
                return Ok(Some(text));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }

        // Broker closed after an unterminated final line
        let line = src.split_to(src.len());
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) {
            return Ok(None);
        }
        Ok(self.finish_line(&line))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    /// Fails with [`ProtocolError::MessageTooLong`] rather than emit a line
    /// this codec would refuse to read.
    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        let line = Self::sanitize(msg);
        if line.len() > self.max_len {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }

        dst.reserve(line.len() + 1);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\n");
        Ok(())
    }
}
