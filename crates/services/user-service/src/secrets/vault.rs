//! Vault KV client for database credentials.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use common::{AppError, AppResult, VaultConfig};

use super::{CredentialProvider, DatabaseCredentials};

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Reads database credentials from a Vault KV secret.
#[derive(Clone)]
pub struct VaultCredentials {
    http: Client,
    secret_url: Url,
    token: String,
}

impl VaultCredentials {
    /// Build a client for `GET {addr}/v1/{secret_path}`.
    pub fn new(config: &VaultConfig) -> AppResult<Self> {
        let base = format!(
            "{}/v1/{}",
            config.addr.trim_end_matches('/'),
            config.secret_path.trim_start_matches('/')
        );
        let secret_url = Url::parse(&base).map_err(|e| {
            AppError::credential(format!("Invalid Vault address '{}': {}", config.addr, e))
        })?;

        let http = Client::builder()
            .build()
            .map_err(|e| AppError::credential(format!("Failed to create Vault client: {}", e)))?;

        Ok(Self {
            http,
            secret_url,
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl CredentialProvider for VaultCredentials {
    async fn fetch_database_credentials(&self) -> AppResult<DatabaseCredentials> {
        tracing::debug!(url = %self.secret_url, "Reading database secret");

        let response = self
            .http
            .get(self.secret_url.clone())
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| AppError::credential(format!("Failed to read secret: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::credential(format!(
                "Secret request returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::credential(format!("Failed to decode secret: {}", e)))?;

        let credentials = parse_secret(&body)?;
        tracing::info!(username = %credentials.username, "Database credentials retrieved");
        Ok(credentials)
    }
}

/// Extract credentials from a KV read response.
///
/// `data.data` is either an object of string fields or, in the older layout,
/// a string holding that object as JSON.
pub fn parse_secret(body: &Value) -> AppResult<DatabaseCredentials> {
    let data = body
        .get("data")
        .and_then(|d| d.get("data"))
        .filter(|d| !d.is_null())
        .ok_or_else(|| AppError::credential("No data in secret"))?;

    let fields = match data {
        Value::Object(_) => data.clone(),
        Value::String(raw) => serde_json::from_str::<Value>(raw)
            .map_err(|e| AppError::credential(format!("Failed to parse secret data: {}", e)))?,
        _ => return Err(AppError::credential("Secret data is neither an object nor a string")),
    };

    Ok(DatabaseCredentials {
        username: string_field(&fields, "username")?,
        password: string_field(&fields, "password")?,
    })
}

fn string_field(fields: &Value, key: &str) -> AppResult<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::credential(format!("Secret has no '{}' field", key)))
}
