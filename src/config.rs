//! Server configuration from command-line flags and the environment.
//!
//! Every flag can also be supplied through the environment variable named
//! in its help text. In the `dev` environment a `.env` file is loaded
//! before parsing; see [`load_env_file`].

use clap::{Args, Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Replacement text for secrets in logged connection strings.
const MASK: &str = "***";

/// Logged in place of connection strings that are not `postgres://` URLs.
const MASKED_CONNECTION_STRING: &str = "<redacted connection string>";

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither a database URL nor a database user was supplied.
    #[error("database user is required when DATABASE_URL is not set")]
    MissingDatabaseUser,

    /// Neither a database URL nor a database name was supplied.
    #[error("database name is required when DATABASE_URL is not set")]
    MissingDatabaseName,

    /// A connection part cannot be placed into a URL.
    #[error("invalid database host: {0}")]
    InvalidDatabaseHost(#[from] url::ParseError),

    /// The assembled URL cannot carry the given component.
    #[error("database URL cannot carry a {0}")]
    UnrepresentableDatabasePart(&'static str),

    /// The `.env` file exists but could not be read.
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppEnv {
    /// Local development; reads `.env`.
    Dev,
    /// Production; the process environment only.
    Prod,
}

impl AppEnv {
    /// Resolves the environment from the `APP_ENV` variable, defaulting to
    /// [`AppEnv::Dev`] when it is unset or unrecognised.
    #[must_use]
    pub fn from_process_env() -> Self {
        std::env::var("APP_ENV")
            .ok()
            .and_then(|value| Self::from_str(&value, true).ok())
            .unwrap_or(Self::Dev)
    }
}

/// Task storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// `PostgreSQL` through a connection pool.
    Postgres,
    /// Process-local storage, lost on exit.
    Memory,
}

/// Top-level server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "task_server", version, about = "REST API for task records")]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "TASKS_BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Storage backend.
    #[arg(long, env = "TASKS_STORAGE", value_enum, default_value_t = StorageKind::Postgres)]
    pub storage: StorageKind,

    /// Deployment environment.
    #[arg(long, env = "APP_ENV", value_enum, default_value_t = AppEnv::Dev)]
    pub app_env: AppEnv,

    /// Default tracing filter, used when `RUST_LOG` is unset.
    #[arg(long, env = "TASKS_LOG", default_value = "info,tower_http=debug")]
    pub log_filter: String,

    /// Database connection settings.
    #[command(flatten)]
    pub database: DatabaseConfig,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts.
    #[arg(long = "database-url", env = "DATABASE_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// Database host.
    #[arg(long = "db-host", env = "POSTGRES_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port.
    #[arg(long = "db-port", env = "POSTGRES_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database user.
    #[arg(long = "db-user", env = "POSTGRES_USER")]
    pub user: Option<String>,

    /// Database password.
    #[arg(long = "db-password", env = "POSTGRES_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name.
    #[arg(long = "db-name", env = "POSTGRES_DB")]
    pub name: Option<String>,

    /// Maximum number of pooled connections.
    #[arg(long = "pool-size", env = "TASKS_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,
}

impl DatabaseConfig {
    /// Returns the connection URL, assembling it from the parts when no
    /// full URL was given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUser`] or
    /// [`ConfigError::MissingDatabaseName`] when a required part is absent.
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        let user = self
            .user
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUser)?;
        let name = self
            .name
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseName)?;
        let mut url = Url::parse("postgres://localhost")?;
        url.set_host(Some(&self.host))?;
        url.set_port(Some(self.port))
            .map_err(|()| ConfigError::UnrepresentableDatabasePart("port"))?;
        url.set_username(user)
            .map_err(|()| ConfigError::UnrepresentableDatabasePart("user"))?;
        url.set_password(self.password.as_deref())
            .map_err(|()| ConfigError::UnrepresentableDatabasePart("password"))?;
        url.path_segments_mut()
            .map_err(|()| ConfigError::UnrepresentableDatabasePart("database name"))?
            .push(name);
        Ok(url.into())
    }

    /// Returns the connection URL with any password masked, for logging.
    ///
    /// Both the userinfo password and `password` query parameters are
    /// masked. Anything that is not a `postgres://` URL, such as a
    /// keyword/value connection string, is replaced entirely.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`DatabaseConfig::connection_url`].
    pub fn redacted_url(&self) -> Result<String, ConfigError> {
        self.connection_url().map(|url| redact_password(&url))
    }
}

/// Loads `.env` unless `APP_ENV` selects production.
///
/// Returns the path of the loaded file, or `None` when nothing was loaded.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] when a `.env` file exists but cannot be
/// parsed.
pub fn load_env_file() -> Result<Option<PathBuf>, ConfigError> {
    if AppEnv::from_process_env() == AppEnv::Prod {
        return Ok(None);
    }
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(ConfigError::EnvFile(err)),
    }
}

fn redact_password(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return MASKED_CONNECTION_STRING.to_owned();
    };
    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return MASKED_CONNECTION_STRING.to_owned();
    }
    if url.password().is_some() && url.set_password(Some(MASK)).is_err() {
        return MASKED_CONNECTION_STRING.to_owned();
    }
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if pairs.iter().any(|(key, _)| is_password_key(key)) {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter().map(|(key, value)| {
            if is_password_key(key) {
                (key.as_str(), MASK)
            } else {
                (key.as_str(), value.as_str())
            }
        }));
    }
    url.into()
}

fn is_password_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("password")
}
