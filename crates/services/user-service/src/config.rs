//! User service configuration.

use std::fmt;
use std::str::FromStr;

use common::{env_or, env_parse, BackoffPolicy, DatabaseConfig, RateLimitConfig, VaultConfig};
use domain::HashCost;

/// Process run mode, selects the default log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Debug,
    Release,
}

impl RunMode {
    /// Filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            RunMode::Debug => "debug",
            RunMode::Release => "info",
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(RunMode::Debug),
            "release" => Ok(RunMode::Release),
            other => Err(format!("unknown mode '{}', expected debug or release", other)),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Debug => write!(f, "debug"),
            RunMode::Release => write!(f, "release"),
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    pub mode: RunMode,
    pub vault: VaultConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
    pub hash_cost: HashCost,
    /// Initial connection retry schedule
    pub backoff: BackoffPolicy,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("SERVER_HOST", &defaults.host),
            port: env_parse("PORT", defaults.port),
            mode: env_parse("APP_MODE", defaults.mode),
            vault: VaultConfig::from_env(),
            database: DatabaseConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            hash_cost: HashCost {
                memory_kib: env_parse("PASSWORD_HASH_MEMORY_KIB", defaults.hash_cost.memory_kib),
                iterations: env_parse("PASSWORD_HASH_ITERATIONS", defaults.hash_cost.iterations),
                ..defaults.hash_cost
            },
            backoff: defaults.backoff,
        }
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            mode: RunMode::default(),
            vault: VaultConfig::default(),
            database: DatabaseConfig::default(),
            rate_limit: RateLimitConfig::default(),
            hash_cost: HashCost::default(),
            backoff: BackoffPolicy::default(),
        }
    }
}
