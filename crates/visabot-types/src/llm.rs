//! LLM request/response types for visabot.
//!
//! These types model the data shapes for interactions with the remote
//! generative-language service: completion requests, responses, usage
//! tracking, and the classified error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a turn in a conversation, named the way the remote service names them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Model => write!(f, "model"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "model" => Ok(MessageRole::Model),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            content: content.into(),
        }
    }
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Response from an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider-assigned response id, when the provider returns one.
    pub id: Option<String>,
    pub content: String,
    pub model: String,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

/// Reason why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::MaxTokens => write!(f, "max_tokens"),
            FinishReason::Safety => write!(f, "safety"),
            FinishReason::Recitation => write!(f, "recitation"),
            FinishReason::Other => write!(f, "other"),
        }
    }
}

impl FromStr for FinishReason {
    type Err = std::convert::Infallible;

    /// Accepts both the wire names (`STOP`, `MAX_TOKENS`) and the display
    /// names. Anything unrecognized becomes [`FinishReason::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "stop" => FinishReason::Stop,
            "max_tokens" => FinishReason::MaxTokens,
            "safety" => FinishReason::Safety,
            "recitation" => FinishReason::Recitation,
            _ => FinishReason::Other,
        })
    }
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Coarse classification of a remote-call failure.
///
/// The relay picks its user-facing fallback message from this, never from
/// the text of the underlying error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Auth,
    Quota,
    Network,
    Timeout,
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Auth => write!(f, "auth"),
            FailureKind::Quota => write!(f, "quota"),
            FailureKind::Network => write!(f, "network"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("quota exceeded (retry after {retry_after_ms:?}ms)")]
    QuotaExceeded { retry_after_ms: Option<u64> },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("provider error (status {status:?}): {message}")]
    Provider { status: Option<u16>, message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmError {
    /// Classify this error for fallback selection.
    pub fn kind(&self) -> FailureKind {
        match self {
            LlmError::AuthenticationFailed(_) => FailureKind::Auth,
            LlmError::QuotaExceeded { .. } => FailureKind::Quota,
            LlmError::Network(_) => FailureKind::Network,
            LlmError::Timeout { .. } => FailureKind::Timeout,
            LlmError::Provider { .. }
            | LlmError::Deserialization(_)
            | LlmError::EmptyResponse
            | LlmError::InvalidRequest(_) => FailureKind::Unknown,
        }
    }
}
