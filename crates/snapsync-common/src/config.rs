//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;

/// Longest session a login may issue (30 days).
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Prefix for environment overrides, e.g. `SNAPSYNC_DATABASE__URL`.
pub const ENV_PREFIX: &str = "SNAPSYNC";

/// Load the configuration.
///
/// `file` overrides the default `config` file name; when given, the file must exist.
pub fn load(file: Option<&str>) -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let source = match file {
        Some(path) => config::File::with_name(path).required(true),
        None => config::File::with_name("config").required(false),
    };

    let cfg = defaults(config::Config::builder())?
        .add_source(source)
        // Environment variables (SNAPSYNC_SERVER__PORT, SNAPSYNC_DATABASE__URL, etc.)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = cfg.try_deserialize()?;
    app_config.check()?;
    Ok(app_config)
}

fn defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "postgres://localhost/snapsync")?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("auth.admin_username", "admin")?
        .set_default("auth.admin_password_hash", "")?
        .set_default("auth.jwt_secret", "")?
        .set_default("auth.session_ttl_secs", 43_200)? // 12 hours
        .set_default("auth.protect_api", true)?
        .set_default("upstream.timeout_secs", 10)?
        .set_default("limits.max_upload_bytes", 52_428_800)? // 50MB
        .set_default("limits.max_files_per_upload", 50)?
        .set_default("limits.default_page_size", 10)?
        .set_default("limits.max_page_size", 100)
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub upstream: UpstreamConfig,
    pub limits: LimitsConfig,
}

impl AppConfig {
    /// Reject configurations the server cannot run with.
    fn check(&self) -> Result<(), config::ConfigError> {
        if self.auth.jwt_secret.len() < 32 {
            return Err(config::ConfigError::Message(
                "auth.jwt_secret must be at least 32 characters".into(),
            ));
        }
        if !(1..=MAX_SESSION_TTL_SECS).contains(&self.auth.session_ttl_secs) {
            return Err(config::ConfigError::Message(format!(
                "auth.session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}"
            )));
        }
        if self.limits.max_page_size == 0 || self.limits.default_page_size == 0 {
            return Err(config::ConfigError::Message(
                "limits page sizes must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// The single dashboard account.
    pub admin_username: String,
    /// Argon2id PHC string, produced by `snapsync hash-password`.
    /// Empty means nobody can log in.
    pub admin_password_hash: String,
    /// JWT signing secret (HS256)
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
    /// Require a session for the data routes, not only for the session endpoint.
    pub protect_api: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the SnapSync API that serves logs and embedding stats.
    /// Unset disables the log viewer and the embeddings counter.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
    pub max_files_per_upload: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
}
