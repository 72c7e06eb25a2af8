//! Unified error handling.
//!
//! One error type crosses the repository, service and HTTP layers and
//! converts into an axum response with a `{"error": "<message>"}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Boxed error used as the source of storage failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Startup
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Connection error: {0}")]
    Connection(String),

    // Client errors
    #[error("Invalid user ID: {0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(
        "Password isn't strong enough, it should have at least 8 characters, one uppercase \
         letter, one lowercase letter, one number and one special character"
    )]
    WeakPassword,

    #[error("User not found")]
    NotFound,

    // Rate limiting
    #[error("Too many requests")]
    TooManyRequests,

    // Storage
    #[error("Storage error during {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: BoxError,
    },

    // Internal
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Get error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Credential(_) => "CREDENTIAL_ERROR",
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::WeakPassword => "WEAK_PASSWORD",
            AppError::NotFound => "NOT_FOUND",
            AppError::TooManyRequests => "TOO_MANY_REQUESTS",
            AppError::Storage { .. } => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier(_) | AppError::InvalidInput(_) | AppError::WeakPassword => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Credential(_)
            | AppError::Connection(_)
            | AppError::Storage { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Storage { context, source } => {
                tracing::error!(context = %context, error = %source, "Storage error");
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Credential(msg) | AppError::Connection(msg) => {
                tracing::error!(code = self.code(), "{}", msg);
                "Service unavailable".to_string()
            }

            // Client errors carry their own message
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidIdentifier(id) => AppError::InvalidIdentifier(id),
            DomainError::InvalidInput(msg) => AppError::InvalidInput(msg),
            DomainError::WeakPassword => AppError::WeakPassword,
            DomainError::NotFound => AppError::NotFound,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(feature = "database")]
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::storage("database", err)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn credential(msg: impl Into<String>) -> Self {
        AppError::Credential(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        AppError::Connection(msg.into())
    }

    pub fn storage(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        AppError::Storage {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Extension trait for annotating storage failures with the operation that
/// produced them.
pub trait ResultExt<T> {
    fn context(self, operation: &str) -> AppResult<T>;
}

impl<T> ResultExt<T> for AppResult<T> {
    fn context(self, operation: &str) -> AppResult<T> {
        self.map_err(|err| match err {
            AppError::Storage { context, source } => AppError::Storage {
                context: format!("{}: {}", operation, context),
                source,
            },
            AppError::Internal(msg) => AppError::Internal(format!("{}: {}", operation, msg)),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let (status, body) = body_json(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "User not found" }));
    }

    #[test]
    fn test_client_errors_are_bad_request() {
        for err in [
            AppError::InvalidIdentifier("abc".into()),
            AppError::invalid_input("bad body"),
            AppError::WeakPassword,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_storage_error_is_sanitized() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed at 10.0.0.3");
        let (status, body) = body_json(AppError::storage("users.find", io)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "A database error occurred");
    }

    #[test]
    fn test_context_prefixes_storage_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "timeout");
        let result: AppResult<()> = Err(AppError::storage("users.find", io));

        match result.context("get user") {
            Err(AppError::Storage { context, .. }) => assert_eq!(context, "get user: users.find"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_context_leaves_client_errors_alone() {
        let result: AppResult<()> = Err(AppError::NotFound);
        assert!(matches!(result.context("get user"), Err(AppError::NotFound)));
    }

    #[test]
    fn test_domain_error_conversion() {
        assert!(matches!(
            AppError::from(DomainError::WeakPassword),
            AppError::WeakPassword
        ));
        assert!(matches!(
            AppError::from(DomainError::invalid_identifier("x")),
            AppError::InvalidIdentifier(_)
        ));
    }
}
