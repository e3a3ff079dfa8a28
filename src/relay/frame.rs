//! Classification of upstream lines

/// One non-empty line of upstream output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `data:` line; payload is what follows the prefix and one optional space
    Data(String),
    /// `event:` line, kept verbatim for passthrough
    Event(String),
    /// Anything else, payload is the whole line
    Plain(String),
}

impl Frame {
    /// Text to hand to the content extractor, `None` for passthrough frames
    pub fn payload(&self) -> Option<&str> {
        match self {
            Frame::Data(payload) | Frame::Plain(payload) => Some(payload),
            Frame::Event(_) => None,
        }
    }
}

/// Classify one line. Empty lines produce no frame.
pub fn classify_line(line: &str) -> Option<Frame> {
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix("data:") {
        let payload = rest.strip_prefix(' ').unwrap_or(rest);
        return Some(Frame::Data(payload.to_string()));
    }

    if line.starts_with("event:") {
        return Some(Frame::Event(line.to_string()));
    }

    Some(Frame::Plain(line.to_string()))
}

/// Classify a line read in fallback mode, where lines still carry their
/// terminator. A bare terminator counts as an empty line and event lines are
/// passed through without it.
pub fn classify_raw_line(line: &str) -> Option<Frame> {
    let content = line.trim_end_matches(['\r', '\n']);
    if content.is_empty() {
        return None;
    }

    if content.starts_with("event:") {
        return Some(Frame::Event(content.to_string()));
    }

    classify_line(line)
}
