//! Token stream relay
//!
//! Turns the upstream completion body into a clean client-facing event
//! stream. Each upstream line goes through the same pipeline:
//!
//! ```text
//! line -> frame::classify_line -> extract::extract_text -> spacing::normalize_piece -> OutboundFrame
//! ```
//!
//! The engine owns the state machine and all fallback decisions; the stages
//! only report what they could not do.

pub mod engine;
pub mod error;
pub mod extract;
pub mod frame;
pub mod mojibake;
pub mod outbound;
pub mod reader;
pub mod session;
pub mod spacing;

pub use engine::{RelayStream, StreamRelay, DB_SAVE_FAILED, STREAM_READ_ERROR};
pub use error::{ReadError, RelayError};
pub use extract::{extract_text, ExtractError};
pub use frame::{classify_line, classify_raw_line, Frame};
pub use mojibake::fix_mojibake;
pub use outbound::OutboundFrame;
pub use reader::UpstreamReader;
pub use session::{ReadMode, StreamSession};
pub use spacing::{normalize_piece, NormalizedPiece};
