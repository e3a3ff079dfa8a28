//! Line reading over the upstream response body
//!
//! The reader owns the upstream byte stream. It offers two ways of pulling
//! lines out of it:
//!
//! - [`UpstreamReader::next_line`]: strict. Lines are split on `\n`, a
//!   trailing `\r` is dropped, and a line that is not valid UTF-8 is a read
//!   failure. The offending bytes stay buffered.
//! - [`UpstreamReader::next_raw_line`]: lossy. Invalid byte sequences are
//!   dropped, lines keep their terminator, and whatever the strict reader left
//!   buffered is read first, so switching modes loses nothing.

use bytes::Bytes;
use futures::StreamExt;

use super::error::ReadError;
use crate::llm::ByteStream;

/// Owns the upstream body; dropping it closes the connection
pub struct UpstreamReader {
    body: ByteStream,
    buffer: Vec<u8>,
    exhausted: bool,
}

impl UpstreamReader {
    pub fn new(body: ByteStream) -> Self {
        Self {
            body,
            buffer: Vec::new(),
            exhausted: false,
        }
    }

    /// Next strictly-decoded line without its terminator, `None` at end of body
    pub async fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
                let mut end = pos;
                if end > 0 && self.buffer[end - 1] == b'\r' {
                    end -= 1;
                }
                let line = std::str::from_utf8(&self.buffer[..end])?.to_string();
                self.buffer.drain(..=pos);
                return Ok(Some(line));
            }

            if self.exhausted {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = std::str::from_utf8(&self.buffer)?.to_string();
                self.buffer.clear();
                return Ok(Some(line));
            }

            self.fill().await?;
        }
    }

    /// Next leniently-decoded line including its terminator, `None` at end of body
    pub async fn next_raw_line(&mut self) -> Result<Option<String>, ReadError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
                let bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
                return Ok(Some(decode_lossy(&bytes)));
            }

            if self.exhausted {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let bytes = std::mem::take(&mut self.buffer);
                return Ok(Some(decode_lossy(&bytes)));
            }

            self.fill().await?;
        }
    }

    /// Pull one chunk from the body into the buffer
    async fn fill(&mut self) -> Result<(), ReadError> {
        match self.body.next().await {
            Some(Ok(chunk)) => {
                self.push(chunk);
                Ok(())
            }
            Some(Err(e)) => Err(ReadError::Transport(e.to_string())),
            None => {
                self.exhausted = true;
                Ok(())
            }
        }
    }

    fn push(&mut self, chunk: Bytes) {
        self.buffer.extend_from_slice(&chunk);
    }
}

/// Decode, silently dropping byte sequences that are not valid UTF-8
fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
