//! Shared domain types for visabot.
//!
//! This crate contains the types passed between the relay layers: LLM
//! request/response shapes, the chat endpoint bodies, relay configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
