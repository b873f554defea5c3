//! Chat endpoint request/response bodies and the fixed user-facing strings.

use serde::{Deserialize, Serialize};

/// Reply text returned when the remote service rejects the credential,
/// or when no credential was configured at all.
pub const API_KEY_FALLBACK: &str = "Error: Invalid or missing API Key.";

/// Reply text returned for every other remote-call failure.
pub const GENERIC_FALLBACK: &str = "I encountered an error processing your request.";

/// Detail of the 400 response for an empty message.
pub const EMPTY_MESSAGE_DETAIL: &str = "Message cannot be empty";

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Body of every 200 reply from `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}
