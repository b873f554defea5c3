//! HTTP/REST API layer for visabot.
//!
//! Axum-based API: `POST /chat` and `GET /health`, with permissive CORS.

pub mod error;
pub mod handlers;
pub mod router;
