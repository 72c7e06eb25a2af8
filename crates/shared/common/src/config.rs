//! Shared configuration structures.
//!
//! Every structure has a `from_env()` constructor that falls back to the
//! defaults below for unset or unparsable variables.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Vault address (for development)
pub const DEFAULT_VAULT_ADDR: &str = "http://localhost:8200";

/// Default KV path holding the database credentials
pub const DEFAULT_VAULT_SECRET_PATH: &str = "secret/data/mongodb";

/// Default database host
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default database port
pub const DEFAULT_DB_PORT: u16 = 27017;

/// Default database name
pub const DEFAULT_DB_NAME: &str = "devenv";

/// Read a string variable, falling back to `default`.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse a variable, falling back to `default`.
pub fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Secrets store configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct VaultConfig {
    /// Vault base address, e.g. `http://localhost:8200`
    pub addr: String,
    /// Access token sent as `X-Vault-Token`
    #[serde(skip_serializing)]
    pub token: String,
    /// Secret path below `/v1/`
    pub secret_path: String,
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("addr", &self.addr)
            .field("token", &"[REDACTED]")
            .field("secret_path", &self.secret_path)
            .finish()
    }
}

impl VaultConfig {
    /// Load from `VAULT_ADDR`, `VAULT_TOKEN` and `VAULT_SECRET_PATH`.
    pub fn from_env() -> Self {
        Self {
            addr: env_or("VAULT_ADDR", DEFAULT_VAULT_ADDR),
            token: env_or("VAULT_TOKEN", ""),
            secret_path: env_or("VAULT_SECRET_PATH", DEFAULT_VAULT_SECRET_PATH),
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_VAULT_ADDR.to_string(),
            token: String::new(),
            secret_path: DEFAULT_VAULT_SECRET_PATH.to_string(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Idle connections older than this are closed
    pub max_idle_seconds: u64,
}

impl DatabaseConfig {
    /// Load from `DB_HOST`, `DB_PORT`, `DB_NAME` and the pool variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("DB_HOST", &defaults.host),
            port: env_parse("DB_PORT", defaults.port),
            name: env_or("DB_NAME", &defaults.name),
            min_connections: env_parse("DB_MIN_POOL_SIZE", defaults.min_connections),
            max_connections: env_parse("DB_MAX_POOL_SIZE", defaults.max_connections),
            max_idle_seconds: env_parse("DB_MAX_IDLE_SECONDS", defaults.max_idle_seconds),
        }
    }

    pub fn max_idle_time(&self) -> Duration {
        Duration::from_secs(self.max_idle_seconds)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            name: DEFAULT_DB_NAME.to_string(),
            min_connections: 10,
            max_connections: 100,
            max_idle_seconds: 30 * 60,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u64,
    /// Window size in seconds
    pub window_seconds: u64,
}

impl RateLimitConfig {
    /// Load from `RATE_LIMIT_REQUESTS` and `RATE_LIMIT_WINDOW_SECONDS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: env_parse("RATE_LIMIT_REQUESTS", defaults.max_requests),
            window_seconds: env_parse("RATE_LIMIT_WINDOW_SECONDS", defaults.window_seconds),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 1,
            window_seconds: 1,
        }
    }
}
