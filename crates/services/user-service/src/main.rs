//! User Service - HTTP server for user management.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_service_lib::config::{RunMode, UserServiceConfig};

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User management microservice")]
struct Cli {
    /// Log at debug level regardless of mode
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "PORT", default_value = "8080")]
        port: u16,
        #[arg(long, env = "APP_MODE", default_value = "debug")]
        mode: RunMode,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, mode } => {
            let default_filter = if cli.verbose {
                "debug"
            } else {
                mode.default_log_filter()
            };

            // Initialize tracing
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| default_filter.into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            let config = UserServiceConfig {
                host,
                port,
                mode,
                ..UserServiceConfig::from_env()
            };

            if let Err(e) = user_service_lib::run(config).await {
                tracing::error!(code = e.code(), error = %e, "User service failed");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
