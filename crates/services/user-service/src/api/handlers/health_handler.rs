//! Liveness handler.

use axum::{response::Json, routing::get, Router};

use super::MessageResponse;
use crate::api::state::AppState;

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}

/// Always answers `{"message": "pong"}`.
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse { message: "pong" })
}
