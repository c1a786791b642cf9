//! Server configuration
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. optional config file (`--config`, any format the `config` crate reads)
//! 3. `APPOINTMENTS__*` environment variables, `__` separating nested keys
//!    (`APPOINTMENTS__DATABASE__MAX_CONNECTIONS=10`)
//! 4. the conventional `DATABASE_URL` and `JWT_SECRET` variables
//! 5. command line flags, applied by the binary

use config::{Config, Environment, File};
use database_layer::PoolSettings;
use error_common::{AppError, Result};
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "APPOINTMENTS";

/// Where appointments are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through the database layer
    Postgres,
    /// Process memory; contents are lost on exit
    Memory,
}

/// Token verification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 secret shared with the token issuer
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name reported by the health endpoint
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Origins allowed by CORS; empty disables cross-origin access
    pub cors_origins: Vec<String>,
    pub storage: StorageBackend,
    pub database: PoolSettings,
    pub auth: AuthSettings,
    pub logging: LoggerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Appointments Server".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_origins: vec!["http://localhost:3000".to_string()],
            storage: StorageBackend::Postgres,
            database: PoolSettings::default(),
            auth: AuthSettings::default(),
            logging: LoggerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = Config::try_from(&ServerConfig::default()).map_err(config_error)?;

        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors_origins")
                .try_parsing(true),
        );

        let mut config: ServerConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }

        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::ConfigError(
                "JWT secret is not set (JWT_SECRET or APPOINTMENTS__AUTH__JWT_SECRET)".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::ConfigError("request_timeout_secs must be positive".to_string()));
        }
        if self.storage == StorageBackend::Postgres && self.database.url.trim().is_empty() {
            return Err(AppError::ConfigError("database.url is required for postgres storage".to_string()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_error(err: config::ConfigError) -> AppError {
    AppError::ConfigError(err.to_string())
}
