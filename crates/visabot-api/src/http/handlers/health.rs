//! GET /health - liveness plus session availability (no auth).

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `available` when startup opened a chat session.
    pub session: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let session = state.relay.session();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        session: if session.is_some() {
            "available"
        } else {
            "unavailable"
        },
        model: session.map(|s| s.model().to_string()),
    })
}
