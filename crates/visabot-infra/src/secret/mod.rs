//! Secret lookup for visabot.
//!
//! The relay needs exactly one secret, the remote-service API key, and
//! reads it from the process environment.

pub mod env;
