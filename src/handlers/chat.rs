use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::conversation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// One message in, one reply out. The pipeline maps every failure to a
/// user-facing sentence, so this handler always answers 200.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let request_id = uuid::Uuid::new_v4();
    let message = req.message.trim().to_string();
    tracing::info!(%request_id, message = %message, "incoming chat message");

    let reply = conversation::process_message(&state, &message).await;
    tracing::info!(%request_id, reply = %reply, "outgoing reply");

    Json(ChatResponse { reply })
}
