//! Route configuration.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health_routes, user_routes};
use crate::api::middleware::rate_limit_middleware;
use crate::api::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness (no rate limit)
        .merge(health_routes())
        .nest(
            "/users",
            user_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            )),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
