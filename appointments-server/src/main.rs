use clap::Parser;
use tracing::info;

use appointments_server::config::{ServerConfig, StorageBackend};
use appointments_server::{create_app, AppointmentsServer};
use error_common::{log_error, AppError, Result};
use logger_redacted::init_tracing;

/// Appointments HTTP server
#[derive(Parser, Debug)]
#[command(name = "appointments-server")]
#[command(about = "Appointment management API for doctors")]
struct Args {
    /// Server bind address, overrides the configuration
    #[arg(long)]
    host: Option<String>,

    /// Server port, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path; a missing file is ignored
    #[arg(short, long, default_value = "appointments-server.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Storage backend, overrides the configuration
    #[arg(long, value_enum)]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = ServerConfig::load(Some(args.config.as_str()))?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(storage) = args.storage {
        config.storage = storage;
    }

    init_tracing(&config.logging, args.verbose)?;
    if let Err(e) = config.validate() {
        log_error("configuration", &e);
        return Err(e);
    }

    let address = config.bind_address();
    info!(version = env!("CARGO_PKG_VERSION"), address = %address, storage = ?config.storage, "Starting {}", config.name);

    let server = AppointmentsServer::from_config(config).await.map_err(|e| {
        log_error("storage", &e);
        e
    })?;
    let app = create_app(server.clone());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to bind to {}: {}", address, e)))?;

    info!("Server running on http://{}", address);
    info!("Health check available at: http://{}/health", address);
    info!("API documentation available at: http://{}/swagger-ui", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::ServerError(format!("HTTP server error: {}", e)))?;

    server.shutdown().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
