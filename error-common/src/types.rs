use thiserror::Error;

/// Process-level error for startup, configuration and serving failures
#[derive(Error, Debug)]
pub enum AppError {
    /// Network communication errors (binding, accepting)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Database connection or migration errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Logging/tracing setup errors
    #[error("Logging error: {0}")]
    LoggingError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable category, used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            AppError::NetworkError(_) => "network",
            AppError::ServerError(_) => "server",
            AppError::DatabaseError(_) => "database",
            AppError::ConfigError(_) => "config",
            AppError::LoggingError(_) => "logging",
            AppError::InternalError(_) => "internal",
            AppError::Other(_) => "other",
        }
    }
}

/// Result type alias for process-level operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Log a process-level error with its category
pub fn log_error(context: &str, error: &AppError) {
    tracing::error!(
        context = context,
        category = error.category(),
        error = %error,
        "Appointments service error occurred"
    );
}
