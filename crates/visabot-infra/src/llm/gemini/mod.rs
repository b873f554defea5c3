//! Google Gemini LLM provider.
//!
//! Speaks the native `models/{model}:generateContent` REST API.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
