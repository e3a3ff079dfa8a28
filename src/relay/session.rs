//! Per-request relay state

use uuid::Uuid;

use super::error::ReadError;
use super::reader::UpstreamReader;
use super::spacing::normalize_piece;

/// How upstream lines are currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    Primary,
    Fallback,
}

/// State of one client stream
///
/// Owns the upstream reader exclusively. `last_char` and `output_parts` change
/// only through [`StreamSession::append_piece`], which keeps the emitted
/// fragments and the final transcript in lockstep.
pub struct StreamSession {
    id: Uuid,
    reader: UpstreamReader,
    last_char: Option<char>,
    output_parts: Vec<String>,
    mode: ReadMode,
}

impl StreamSession {
    pub fn new(reader: UpstreamReader) -> Self {
        Self {
            id: Uuid::new_v4(),
            reader,
            last_char: None,
            output_parts: Vec::new(),
            mode: ReadMode::Primary,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    pub fn last_char(&self) -> Option<char> {
        self.last_char
    }

    pub fn output_parts(&self) -> &[String] {
        &self.output_parts
    }

    /// Read the next line in the current mode
    pub async fn read_line(&mut self) -> Result<Option<String>, ReadError> {
        match self.mode {
            ReadMode::Primary => self.reader.next_line().await,
            ReadMode::Fallback => self.reader.next_raw_line().await,
        }
    }

    /// Switch to fallback reading. Returns `false` if already switched.
    pub fn enter_fallback(&mut self) -> bool {
        if self.mode == ReadMode::Fallback {
            return false;
        }
        self.mode = ReadMode::Fallback;
        true
    }

    /// Normalize a raw fragment and record it
    ///
    /// Returns the text to emit, or `None` when the fragment normalizes to
    /// nothing.
    pub fn append_piece(&mut self, raw: &str) -> Option<String> {
        let normalized = normalize_piece(self.last_char, raw);
        self.last_char = normalized.last_char;
        if normalized.text.is_empty() {
            return None;
        }
        self.output_parts.push(normalized.text.clone());
        Some(normalized.text)
    }

    /// End the session, releasing the upstream connection, and return the
    /// full transcript
    pub fn finish(self) -> String {
        let StreamSession {
            reader,
            output_parts,
            ..
        } = self;
        drop(reader);
        output_parts.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use bytes::Bytes;
    use futures::stream;

    fn empty_session() -> StreamSession {
        let body = stream::empty::<Result<Bytes, LlmError>>();
        StreamSession::new(UpstreamReader::new(Box::pin(body)))
    }

    #[test]
    fn test_append_tracks_parts_and_last_char() {
        let mut session = empty_session();
        assert_eq!(session.append_piece("Hi").as_deref(), Some("Hi"));
        assert_eq!(session.append_piece("there").as_deref(), Some(" there"));
        assert_eq!(session.last_char(), Some('e'));
        assert_eq!(session.output_parts(), ["Hi", " there"]);
        assert_eq!(session.finish(), "Hi there");
    }

    #[test]
    fn test_empty_piece_is_not_recorded() {
        let mut session = empty_session();
        assert_eq!(session.append_piece(""), None);
        assert!(session.output_parts().is_empty());
        assert_eq!(session.last_char(), None);
    }

    #[test]
    fn test_fallback_is_entered_once() {
        let mut session = empty_session();
        assert_eq!(session.mode(), ReadMode::Primary);
        assert!(session.enter_fallback());
        assert!(!session.enter_fallback());
        assert_eq!(session.mode(), ReadMode::Fallback);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(empty_session().id(), empty_session().id());
    }
}
