//! Request handlers.

mod health_handler;
mod user_handler;

use serde::Serialize;

pub use health_handler::{health_routes, ping};
pub use user_handler::{create_user, delete_user, get_all_users, get_user, update_user, user_routes};

/// `{"message": ...}` body for responses without a resource.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
