//! Observability setup for visabot.
//!
//! Structured logging via `tracing-subscriber`.

pub mod tracing_setup;
