//! Secrets retrieval.

mod vault;

use async_trait::async_trait;

use common::AppResult;

pub use vault::{parse_secret, VaultCredentials};

/// Username and password for the document store.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

// Don't expose the password in debug output
impl std::fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Source of database credentials, consulted once at startup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn fetch_database_credentials(&self) -> AppResult<DatabaseCredentials>;
}
