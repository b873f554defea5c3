//! ChatRelay -- the single operation behind `POST /chat`.
//!
//! Validates the message, forwards it to the shared [`ChatSession`] under a
//! deadline, and turns every remote-side failure into a fixed fallback reply.
//! Only validation failures escape as errors; the raw detail of everything
//! else is logged here and never returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use visabot_types::chat::{API_KEY_FALLBACK, ChatResponse, GENERIC_FALLBACK};
use visabot_types::error::{ChatError, SessionUnavailableReason};
use visabot_types::llm::{FailureKind, LlmError};

use super::session::ChatSession;

/// Pick the user-facing reply for a classified failure.
pub fn fallback_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Auth => API_KEY_FALLBACK,
        FailureKind::Quota | FailureKind::Network | FailureKind::Timeout | FailureKind::Unknown => {
            GENERIC_FALLBACK
        }
    }
}

/// Front door to the chat session.
///
/// Holds either a working session or the reason startup could not open one.
/// In the latter state every non-empty message takes the fallback path.
pub struct ChatRelay {
    session: Result<Arc<ChatSession>, SessionUnavailableReason>,
    timeout: Duration,
}

impl ChatRelay {
    pub fn new(
        session: Result<Arc<ChatSession>, SessionUnavailableReason>,
        timeout: Duration,
    ) -> Self {
        Self { session, timeout }
    }

    /// A relay whose session could not be opened.
    pub fn unavailable(reason: SessionUnavailableReason, timeout: Duration) -> Self {
        Self::new(Err(reason), timeout)
    }

    pub fn is_available(&self) -> bool {
        self.session.is_ok()
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&Arc<ChatSession>> {
        self.session.as_ref().ok()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Reject empty messages. Whitespace-only text is accepted.
    pub fn validate(message: &str) -> Result<(), ChatError> {
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        Ok(())
    }

    /// Forward `message` to the session and return the raw reply text.
    ///
    /// Errors are returned unclassified; use [`ChatRelay::reply`] for the
    /// endpoint behavior.
    pub async fn send(&self, message: &str) -> Result<String, ChatError> {
        Self::validate(message)?;

        let session = match &self.session {
            Ok(session) => session,
            Err(reason) => return Err(ChatError::SessionUnavailable(reason.clone())),
        };

        match tokio::time::timeout(self.timeout, session.send_message(message)).await {
            Ok(Ok(response)) => Ok(response.content),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(LlmError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into()),
        }
    }

    /// Relay `message` and produce the endpoint's reply.
    ///
    /// Returns `Err` only for [`ChatError::EmptyMessage`]. Every other
    /// failure is logged and becomes a fallback [`ChatResponse`].
    pub async fn reply(&self, message: &str) -> Result<ChatResponse, ChatError> {
        match self.send(message).await {
            Ok(text) => {
                debug!(reply_len = text.len(), "Relayed chat reply");
                Ok(ChatResponse::new(text))
            }
            Err(err) => match err.kind() {
                None => Err(err),
                Some(kind) => {
                    warn!(error = %err, kind = %kind, "Error during chat");
                    Ok(ChatResponse::new(fallback_message(kind)))
                }
            },
        }
    }
}
