//! The floating-assistant chat endpoint.

use axum::{Json, extract::State};
use greenline_assistant::ToolReply;
use greenline_core::ChatTurnId;
use serde::Deserialize;

use crate::auth::{AppState, RequireSession};

/// Request body for `POST /api/floatingagent`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The staff member's message.
    pub message: String,
}

/// Answers a chat message.
///
/// Dispatch decides between rule-based navigation help and the generative
/// fallback; either way the reply is structured and this handler never
/// fails — generative trouble surfaces as canned warning text.
pub async fn floating_agent(
    State(state): State<AppState>,
    _session: RequireSession,
    Json(request): Json<ChatRequest>,
) -> Json<ToolReply> {
    let turn = ChatTurnId::new();
    tracing::debug!(%turn, "chat turn received");

    Json(state.assistant.reply(&request.message).await)
}
