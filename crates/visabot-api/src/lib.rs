//! visabot HTTP application layer.
//!
//! Exposes the router and state so the binary and the integration tests
//! assemble the exact same service.

pub mod http;
pub mod state;
