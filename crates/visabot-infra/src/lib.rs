//! Infrastructure layer for visabot.
//!
//! Contains the concrete [`LlmProvider`](visabot_core::llm::provider::LlmProvider)
//! for the Gemini `generateContent` API, environment-based secret lookup,
//! the config-file loader, and the startup wiring that opens the chat session.

pub mod config;
pub mod llm;
pub mod secret;
