//! # SnapSync Admin server
//!
//! Main binary: loads configuration, connects to PostgreSQL, runs migrations,
//! and serves the admin REST API until Ctrl+C / SIGTERM.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use snapsync_api::{build_router, upstream::UpstreamClient, AppState};
use snapsync_db::Database;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "snapsync", version, about = "SnapSync admin back end")]
struct Cli {
    /// Config file to load instead of ./config.toml
    #[arg(long, global = true, env = "SNAPSYNC_CONFIG")]
    config: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print an Argon2id hash for `auth.admin_password_hash`
    HashPassword {
        password: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::HashPassword { password } => {
            let hash = snapsync_api::auth::hash_password(&password)
                .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
            println!("{hash}");
            Ok(())
        }
        Command::Serve => serve(cli.config.as_deref(), cli.log_format).await,
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "snapsync=debug,tower_http=debug".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn serve(config_file: Option<&str>, log_format: LogFormat) -> anyhow::Result<()> {
    init_tracing(log_format);

    let config = snapsync_common::config::load(config_file).context("invalid configuration")?;

    tracing::info!("Starting SnapSync Admin v{}", env!("CARGO_PKG_VERSION"));
    if config.auth.admin_password_hash.is_empty() {
        tracing::warn!("auth.admin_password_hash is empty; dashboard login is disabled");
    }
    if !config.auth.protect_api {
        tracing::warn!("auth.protect_api is off; data routes are open without a session");
    }

    let db = Database::connect(&config.database).await?;
    db.migrate().await?;

    let upstream = UpstreamClient::from_config(&config.upstream)?;
    match &upstream {
        Some(client) => tracing::info!("Upstream API at {}", client.base_url()),
        None => tracing::info!("No upstream configured; log viewer disabled"),
    }

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let router = build_router(AppState::new(db.clone(), Arc::new(config), upstream));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    db.close().await;
    tracing::info!("Database closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
}
