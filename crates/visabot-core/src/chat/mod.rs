//! Chat session and relay.
//!
//! - `ChatSession`: one conversational context with the remote service
//! - `ChatRelay`: validation, deadline, and fallback mapping in front of it

pub mod relay;
pub mod session;
