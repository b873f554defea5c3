use std::fmt;

use thiserror::Error;

use crate::chat::EMPTY_MESSAGE_DETAIL;
use crate::llm::{FailureKind, LlmError};

/// Why the chat session could not be opened at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUnavailableReason {
    /// No API key was found in the environment.
    MissingCredential,
    /// Session construction failed for any other reason.
    InitFailed(String),
}

impl fmt::Display for SessionUnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionUnavailableReason::MissingCredential => write!(f, "missing API credential"),
            SessionUnavailableReason::InitFailed(msg) => write!(f, "initialization failed: {msg}"),
        }
    }
}

/// Errors related to relaying a chat message.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{}", EMPTY_MESSAGE_DETAIL)]
    EmptyMessage,

    #[error("chat session unavailable: {0}")]
    SessionUnavailable(SessionUnavailableReason),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ChatError {
    /// Failure class used to pick the fallback reply.
    ///
    /// A process started without a credential answers as if the remote
    /// service had rejected the key.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ChatError::EmptyMessage => None,
            ChatError::SessionUnavailable(SessionUnavailableReason::MissingCredential) => {
                Some(FailureKind::Auth)
            }
            ChatError::SessionUnavailable(SessionUnavailableReason::InitFailed(_)) => {
                Some(FailureKind::Unknown)
            }
            ChatError::Llm(e) => Some(e.kind()),
        }
    }
}
