use database_layer::DatabasePool;
use error_common::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::{ServerConfig, StorageBackend};
use crate::middleware::JwtVerifier;
use crate::repository::{AppointmentStore, InMemoryAppointmentStore, PgAppointmentStore};
use crate::services::AppointmentService;

/// Shared server state handed to every handler
#[derive(Clone)]
pub struct AppointmentsServer {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Appointment use cases
    pub service: AppointmentService,
    /// Bearer token verification
    pub jwt: Arc<JwtVerifier>,
    /// Postgres pool behind the store, closed on shutdown
    pool: Option<DatabasePool>,
}

impl AppointmentsServer {
    /// Assemble the server state around an existing store
    pub fn new(config: ServerConfig, store: Arc<dyn AppointmentStore>) -> Self {
        let jwt = Arc::new(JwtVerifier::new(&config.auth.jwt_secret));
        Self {
            config: Arc::new(config),
            service: AppointmentService::new(store),
            jwt,
            pool: None,
        }
    }

    /// Open the configured store, applying migrations when asked to
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        match config.storage {
            StorageBackend::Postgres => {
                let pool = DatabasePool::new(&config.database).await?;
                if config.database.run_migrations {
                    pool.migrate().await?;
                }
                Ok(Self::with_pool(config, pool))
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage; data is lost on shutdown");
                Ok(Self::new(config, Arc::new(InMemoryAppointmentStore::new())))
            }
        }
    }

    /// Serve appointments from `pool`
    pub fn with_pool(config: ServerConfig, pool: DatabasePool) -> Self {
        let store: Arc<dyn AppointmentStore> = Arc::new(PgAppointmentStore::new(pool.clone()));
        Self {
            pool: Some(pool),
            ..Self::new(config, store)
        }
    }

    /// Release storage resources once the listener has stopped
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }

    pub fn store(&self) -> &Arc<dyn AppointmentStore> {
        self.service.store()
    }
}
