//! User handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use common::{AppError, AppResult};
use domain::{NewUser, User, UserPatch};

use super::MessageResponse;
use crate::api::extractors::ValidatedJson;
use crate::api::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Blank ids are a missing parameter; anything else is checked by the service.
fn require_id(id: &str) -> AppResult<&str> {
    if id.trim().is_empty() {
        return Err(AppError::invalid_input("User ID is required in the request"));
    }
    Ok(id)
}

/// List all users
pub async fn get_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.user_service.get_all_users().await?;
    Ok(Json(users))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.user_service.get_user(require_id(&id)?).await?;
    Ok(Json(user))
}

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(draft): ValidatedJson<NewUser>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state.user_service.create_user(draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully",
        }),
    ))
}

/// Update the fields present in the body
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UserPatch>,
) -> AppResult<Json<MessageResponse>> {
    state
        .user_service
        .update_user(require_id(&id)?, patch)
        .await?;
    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(require_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
