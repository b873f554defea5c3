//! Business logic and port trait definitions for visabot.
//!
//! This crate defines the `LlmProvider` port that the infrastructure layer
//! implements, plus the chat session and relay that sit behind the HTTP
//! endpoint. It depends only on `visabot-types` -- never on `visabot-infra`
//! or any HTTP crate.

pub mod chat;
pub mod llm;
