//! Frames sent to the client

use serde_json::json;

use crate::chat_db::PersistedExchange;

/// One unit of the client-facing event stream
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    /// A normalized text fragment
    Data(String),
    /// An upstream `event:` line, forwarded as is
    Passthrough(String),
    /// The exchange was stored; the stream ends
    Done(PersistedExchange),
    /// The stream ends without a stored exchange
    Error { detail: String },
}

impl OutboundFrame {
    pub fn error(detail: impl Into<String>) -> Self {
        OutboundFrame::Error {
            detail: detail.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OutboundFrame::Done(_) | OutboundFrame::Error { .. })
    }

    /// JSON body carried by terminal frames
    pub fn terminal_payload(&self) -> Option<String> {
        match self {
            OutboundFrame::Done(saved) => Some(
                json!({
                    "id": saved.id,
                    "created_at": saved.created_at,
                })
                .to_string(),
            ),
            OutboundFrame::Error { detail } => Some(json!({ "detail": detail }).to_string()),
            _ => None,
        }
    }

    /// Serialized `text/event-stream` unit, blank-line terminated
    pub fn to_wire(&self) -> String {
        match self {
            OutboundFrame::Data(text) => {
                let mut out = String::new();
                for line in text.split('\n') {
                    out.push_str("data: ");
                    out.push_str(line);
                    out.push('\n');
                }
                out.push('\n');
                out
            }
            OutboundFrame::Passthrough(line) => format!("{}\n\n", line),
            OutboundFrame::Done(_) => format!(
                "event: done\ndata: {}\n\n",
                self.terminal_payload().unwrap_or_default()
            ),
            OutboundFrame::Error { .. } => format!(
                "event: error\ndata: {}\n\n",
                self.terminal_payload().unwrap_or_default()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_data_wire_format() {
        assert_eq!(OutboundFrame::Data(" there".into()).to_wire(), "data:  there\n\n");
        assert_eq!(
            OutboundFrame::Data("a\n\nb".into()).to_wire(),
            "data: a\ndata: \ndata: b\n\n"
        );
    }

    #[test]
    fn test_passthrough_wire_format() {
        assert_eq!(
            OutboundFrame::Passthrough("event: ping".into()).to_wire(),
            "event: ping\n\n"
        );
    }

    #[test]
    fn test_done_wire_format() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let frame = OutboundFrame::Done(PersistedExchange {
            id: 7,
            created_at: Some(created_at),
        });
        assert_eq!(
            frame.to_wire(),
            "event: done\ndata: {\"created_at\":\"2024-05-01T12:00:00Z\",\"id\":7}\n\n"
        );
        assert!(frame.is_terminal());

        let frame = OutboundFrame::Done(PersistedExchange {
            id: 8,
            created_at: None,
        });
        assert_eq!(frame.to_wire(), "event: done\ndata: {\"created_at\":null,\"id\":8}\n\n");
    }

    #[test]
    fn test_done_timestamp_matches_history_rendering() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap();
        let saved = PersistedExchange {
            id: 9,
            created_at: Some(created_at),
        };
        let stored = crate::chat_db::StoredMessage {
            id: 9,
            content: "hi".into(),
            response: "hello".into(),
            created_at: Some(created_at),
        };

        let payload: serde_json::Value =
            serde_json::from_str(&OutboundFrame::Done(saved).terminal_payload().unwrap()).unwrap();
        assert_eq!(payload["created_at"], serde_json::to_value(&stored).unwrap()["created_at"]);
    }

    #[test]
    fn test_error_wire_format() {
        let frame = OutboundFrame::error("DB save failed");
        assert_eq!(frame.to_wire(), "event: error\ndata: {\"detail\":\"DB save failed\"}\n\n");
        assert!(frame.is_terminal());
        assert!(!OutboundFrame::Data("x".into()).is_terminal());
    }
}
