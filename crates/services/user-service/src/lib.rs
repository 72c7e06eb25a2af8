//! User Service Library
//!
//! HTTP CRUD service for users stored in MongoDB, with database credentials
//! read from Vault at startup.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod secrets;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use common::{AppError, AppResult};
use domain::{PasswordHasher, UserRules};

use crate::api::middleware::RateLimiter;
use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::infra::{Database, SHUTDOWN_GRACE};
use crate::repository::UserStore;
use crate::secrets::VaultCredentials;
use crate::service::UserManager;

/// Start the service and block until it shuts down.
///
/// Credentials are fetched, the database connection is established with
/// retries, and only then is the listener bound.
pub async fn run(config: UserServiceConfig) -> AppResult<()> {
    info!(mode = %config.mode, "Starting user service");

    let vault = VaultCredentials::new(&config.vault)?;
    let db = Database::connect_with_retries(&vault, &config.database, &config.backoff).await?;

    // Validation patterns and hash cost are built once and injected
    let rules = UserRules::new()?;
    let hasher = PasswordHasher::new(config.hash_cost)?;

    let user_repo = Arc::new(UserStore::new(&db));
    let user_service = Arc::new(UserManager::new(user_repo, rules, hasher));
    let rate_limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));

    let state = AppState::new(user_service, rate_limiter);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;
    info!("User service listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    info!("Server stopped, closing database connection");
    db.shutdown(SHUTDOWN_GRACE).await;

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
