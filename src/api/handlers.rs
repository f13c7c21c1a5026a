//! HTTP handlers for health and conversation retrieval

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::debug;

use super::auth::Caller;
use super::error::ApiResult;
use crate::conversation::ConversationView;
use crate::db;
use crate::state::AppState;

/// Liveness plus a database probe
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "database": db::ping(&state.db).await,
    }))
}

/// GET /conversation/{id}/messages
pub async fn conversation_messages_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: Caller,
) -> ApiResult<Json<ConversationView>> {
    let view = state.resolver.resolve(&id, &caller.auth_condition()).await?;

    debug!(
        shared = view.shared,
        messages = view.messages.len(),
        "Conversation resolved"
    );
    Ok(Json(view))
}
