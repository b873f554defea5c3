//! Chat endpoint.
//!
//! POST /chat
//!
//! Request: `{ "message": "..." }`. Response: `{ "response": "..." }` with
//! 200 for every non-empty message, including remote failures (which carry
//! a fallback text). An empty message is a 400.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use visabot_types::chat::{ChatRequest, ChatResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat -- relay one message to the chat session.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(body) = payload?;
    let reply = state.relay.reply(&body.message).await?;
    Ok(Json(reply))
}
