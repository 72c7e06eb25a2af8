//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling with HTTP response conversion
//! - Configuration structures loaded from the environment
//! - The retry/backoff helper used during startup

pub mod config;
pub mod error;
pub mod retry;

pub use config::*;
pub use error::{AppError, AppResult, BoxError, ResultExt};
pub use retry::{retry_with_backoff, BackoffPolicy};
