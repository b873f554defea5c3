//! Application state shared by the HTTP handlers.
//!
//! The relay (and the session inside it) is created once at startup and
//! injected here; handlers never reach for process-global state.

use std::sync::Arc;

use visabot_core::chat::relay::ChatRelay;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
}

impl AppState {
    pub fn new(relay: ChatRelay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}
