// Tracing subscriber installation
use error_common::{AppError, Result};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggerConfig;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_filter(config: &LoggerConfig, verbose: bool) -> String {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    format!(
        "appointments_server={level},database_layer={level},logger_redacted={level},tower_http=info,sqlx=warn,hyper=info"
    )
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggerConfig, verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config, verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json {
        registry
            .with(
                fmt::layer()
                    .with_target(config.with_target)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(config.with_target)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_line_number(verbose)
                    .with_level(true),
            )
            .try_init()
    };

    installed.map_err(|e| AppError::LoggingError(format!("Failed to install tracing subscriber: {}", e)))
}
