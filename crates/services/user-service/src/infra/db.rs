//! Database connection and initialization.

use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, Credential, ServerAddress},
    Client, Collection,
};

use common::{retry_with_backoff, AppError, AppResult, BackoffPolicy, DatabaseConfig};

use crate::secrets::{CredentialProvider, DatabaseCredentials};

/// Upper bound on closing the client during shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

const APP_NAME: &str = "user-service";

/// Database wrapper for connection management
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    name: String,
}

impl Database {
    /// Open a client and confirm it with a ping, each bounded by `timeout`.
    pub async fn connect(
        credentials: &DatabaseCredentials,
        config: &DatabaseConfig,
        timeout: Duration,
    ) -> AppResult<Self> {
        let options = client_options(credentials, config, timeout);
        let client = Client::with_options(options)
            .map_err(|e| AppError::connection(format!("Invalid client options: {}", e)))?;

        let db = Self {
            client,
            name: config.name.clone(),
        };

        tokio::time::timeout(timeout, db.ping())
            .await
            .map_err(|_| AppError::connection(format!("Ping timed out after {:?}", timeout)))?
            .map_err(|e| AppError::connection(format!("Ping failed: {}", e)))?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            db = %config.name,
            "Database connected"
        );
        Ok(db)
    }

    /// Fetch credentials once, then connect following `policy`.
    ///
    /// A credential failure is returned immediately; only the connection
    /// itself is retried.
    pub async fn connect_with_retries(
        provider: &dyn CredentialProvider,
        config: &DatabaseConfig,
        policy: &BackoffPolicy,
    ) -> AppResult<Self> {
        let credentials = provider.fetch_database_credentials().await?;

        retry_with_backoff(policy, |attempt, timeout| {
            tracing::info!(attempt, "Connecting to database");
            Self::connect(&credentials, config, timeout)
        })
        .await
    }

    /// Check database connectivity with `{ping: 1}`.
    pub async fn ping(&self) -> AppResult<()> {
        self.client
            .database(&self.name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Typed handle on a collection of the configured database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(&self.name).collection(name)
    }

    /// Close the client, giving up after `grace`.
    pub async fn shutdown(self, grace: Duration) {
        match tokio::time::timeout(grace, self.client.shutdown()).await {
            Ok(()) => tracing::info!("Database connection closed"),
            Err(_) => tracing::warn!("Database shutdown timed out after {:?}", grace),
        }
    }
}

fn client_options(
    credentials: &DatabaseCredentials,
    config: &DatabaseConfig,
    timeout: Duration,
) -> ClientOptions {
    let mut options = ClientOptions::default();
    options.hosts = vec![ServerAddress::Tcp {
        host: config.host.clone(),
        port: Some(config.port),
    }];
    options.credential = Some(
        Credential::builder()
            .username(credentials.username.clone())
            .password(credentials.password.clone())
            .build(),
    );
    options.app_name = Some(APP_NAME.to_string());
    options.min_pool_size = Some(config.min_connections);
    options.max_pool_size = Some(config.max_connections);
    options.max_idle_time = Some(config.max_idle_time());
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
    options
}
