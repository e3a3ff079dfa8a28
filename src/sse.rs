use std::convert::Infallible;
use warp::sse::Event;

use crate::relay::OutboundFrame;

/// Convert a relay frame into a warp SSE event
///
/// warp writes fields as `name:value` with no separator, so every value is
/// given a single leading space here to produce `data: <piece>` and
/// `event: <name>` on the wire. Multi-line pieces become one `data:` line per
/// line of text.
pub fn frame_to_event(frame: OutboundFrame) -> Result<Event, Infallible> {
    let event = match &frame {
        OutboundFrame::Data(text) => Event::default().data(pad_lines(text)),
        OutboundFrame::Passthrough(line) => {
            let name = line.strip_prefix("event:").unwrap_or(line);
            Event::default().event(name)
        }
        OutboundFrame::Done(_) => Event::default()
            .event(" done")
            .data(pad_lines(&frame.terminal_payload().unwrap_or_default())),
        OutboundFrame::Error { .. } => Event::default()
            .event(" error")
            .data(pad_lines(&frame.terminal_payload().unwrap_or_default())),
    };

    Ok(event)
}

fn pad_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| format!(" {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_db::PersistedExchange;

    fn wire(frame: OutboundFrame) -> String {
        frame_to_event(frame).unwrap().to_string()
    }

    #[test]
    fn test_data_event_matches_wire_format() {
        let frame = OutboundFrame::Data("Hi".to_string());
        assert_eq!(wire(frame.clone()), frame.to_wire());

        let frame = OutboundFrame::Data(" there".to_string());
        assert_eq!(wire(frame.clone()), frame.to_wire());
    }

    #[test]
    fn test_multiline_data_event() {
        let frame = OutboundFrame::Data("one\n\ntwo".to_string());
        assert_eq!(wire(frame.clone()), "data: one\ndata: \ndata: two\n\n");
        assert_eq!(wire(frame.clone()), frame.to_wire());
    }

    #[test]
    fn test_passthrough_event() {
        let frame = OutboundFrame::Passthrough("event: ping".to_string());
        assert_eq!(wire(frame), "event: ping\n\n");
    }

    #[test]
    fn test_terminal_events() {
        let done = OutboundFrame::Done(PersistedExchange {
            id: 3,
            created_at: None,
        });
        assert_eq!(wire(done.clone()), done.to_wire());

        let error = OutboundFrame::error("Upstream stream read error");
        assert_eq!(
            wire(error),
            "event: error\ndata: {\"detail\":\"Upstream stream read error\"}\n\n"
        );
    }

    #[test]
    fn test_pad_lines() {
        assert_eq!(pad_lines("a"), " a");
        assert_eq!(pad_lines("a\nb"), " a\n b");
        assert_eq!(pad_lines(""), " ");
    }
}
