//! Stream relay state machine
//!
//! `INIT` runs in [`StreamRelay::open`]: validation, user lookup and the
//! upstream connection. Everything after that runs lazily inside the stream
//! returned by [`RelayStream::into_frames`], so dropping that stream (client
//! disconnect) releases the upstream connection and skips persistence.
//! [`RelayStream::spawn_frames`] runs the same stream on its own task for
//! servers that need a `Sync` body.

use async_stream::stream;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};

use super::error::RelayError;
use super::extract::extract_text;
use super::frame::{classify_line, classify_raw_line, Frame};
use super::outbound::OutboundFrame;
use super::reader::UpstreamReader;
use super::session::{ReadMode, StreamSession};
use crate::chat_db::{ExchangePersister, IdentityLookup, UserId};
use crate::llm::CompletionProvider;

/// Detail of the terminal frame when the fallback reader fails too
pub const STREAM_READ_ERROR: &str = "Upstream stream read error";

/// Detail of the terminal frame when the finished exchange cannot be stored
pub const DB_SAVE_FAILED: &str = "DB save failed";

/// Frames buffered between the session task and the client
const FRAME_BUFFER: usize = 16;

/// Opens relay sessions against one upstream and one store
pub struct StreamRelay {
    identity: Arc<dyn IdentityLookup>,
    persister: Arc<dyn ExchangePersister>,
    upstream: Arc<dyn CompletionProvider>,
}

impl StreamRelay {
    pub fn new(
        identity: Arc<dyn IdentityLookup>,
        persister: Arc<dyn ExchangePersister>,
        upstream: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            identity,
            persister,
            upstream,
        }
    }

    /// Validate the request and connect upstream
    ///
    /// No frame has been produced when this fails; the caller reports the
    /// error as a plain HTTP response.
    pub async fn open(&self, username: &str, message: &str) -> Result<RelayStream, RelayError> {
        if message.trim().is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let user = self
            .identity
            .find_user(username)
            .await?
            .ok_or_else(|| RelayError::UserNotFound(username.to_string()))?;

        let body = self
            .upstream
            .stream_completion(message)
            .await
            .inspect_err(|e| error!(username, error = %e, "Failed to open upstream stream"))?;

        let session = StreamSession::new(UpstreamReader::new(body));
        info!(username, session = %session.id(), "Relay session started");

        Ok(RelayStream {
            session,
            user,
            message: message.to_string(),
            persister: Arc::clone(&self.persister),
        })
    }
}

/// An accepted request with a live upstream body
pub struct RelayStream {
    session: StreamSession,
    user: UserId,
    message: String,
    persister: Arc<dyn ExchangePersister>,
}

impl RelayStream {
    /// Drive the session on a spawned task and receive its frames
    ///
    /// The task stops as soon as the receiver is dropped. Whatever it was
    /// waiting on at that point, upstream read or persistence, is dropped
    /// with it.
    pub fn spawn_frames(self) -> ReceiverStream<OutboundFrame> {
        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let id = self.session.id();

        tokio::spawn(async move {
            let mut frames = Box::pin(self.into_frames());
            loop {
                let frame = tokio::select! {
                    frame = frames.next() => frame,
                    _ = tx.closed() => {
                        info!(session = %id, "Client disconnected, abandoning session");
                        break;
                    }
                };
                let Some(frame) = frame else { break };
                if tx.send(frame).await.is_err() {
                    info!(session = %id, "Client disconnected, abandoning session");
                    break;
                }
            }
        });

        ReceiverStream::new(rx)
    }

    /// Drive the session to completion, yielding frames as they are produced
    ///
    /// The last frame is always terminal: `Done` once the exchange is stored,
    /// `Error` otherwise.
    pub fn into_frames(self) -> impl Stream<Item = OutboundFrame> + Send + 'static {
        let RelayStream {
            mut session,
            user,
            message,
            persister,
        } = self;
        let id = session.id();

        stream! {
            let completed = loop {
                let line = match session.read_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break true,
                    Err(e) => {
                        if session.enter_fallback() {
                            warn!(session = %id, error = %e, "Line read failed, switching to fallback reader");
                            continue;
                        }
                        error!(session = %id, error = %e, "Fallback read failed");
                        break false;
                    }
                };

                if let Some(frame) = relay_line(&mut session, &line) {
                    yield frame;
                }
            };

            let transcript = session.finish();

            if !completed {
                yield OutboundFrame::error(STREAM_READ_ERROR);
                return;
            }

            match persister.persist_exchange(user, &message, &transcript).await {
                Ok(saved) => {
                    info!(session = %id, message_id = saved.id, "Relay session finished");
                    yield OutboundFrame::Done(saved);
                }
                Err(e) => {
                    error!(session = %id, error = %e, "Failed to save streamed exchange");
                    yield OutboundFrame::error(DB_SAVE_FAILED);
                }
            }
        }
    }
}

/// Classify, extract and normalize one upstream line
fn relay_line(session: &mut StreamSession, line: &str) -> Option<OutboundFrame> {
    let frame = match session.mode() {
        ReadMode::Primary => classify_line(line),
        ReadMode::Fallback => classify_raw_line(line),
    }?;

    let payload = match frame {
        Frame::Event(event) => return Some(OutboundFrame::Passthrough(event)),
        Frame::Data(payload) | Frame::Plain(payload) => payload,
    };

    let piece = match extract_text(&payload) {
        Ok(text) => text,
        Err(e) => {
            debug!(session = %session.id(), error = %e, "Relaying unstructured payload as text");
            payload
        }
    };

    session.append_piece(&piece).map(OutboundFrame::Data)
}
