//! Application state for dependency injection.

use std::sync::Arc;

use crate::api::middleware::RateLimiter;
use crate::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Create new app state.
    pub fn new(user_service: Arc<dyn UserService>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            user_service,
            rate_limiter,
        }
    }
}
