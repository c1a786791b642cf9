use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::server::AppointmentsServer;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status
    #[schema(example = "healthy")]
    pub status: String,
    /// Server name
    #[schema(example = "Appointments Server")]
    pub name: String,
    /// API version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2025-08-05T09:30:00Z")]
    pub timestamp: String,
    /// Storage backend in use
    #[schema(example = "postgres")]
    pub storage: String,
    /// Individual dependency checks
    pub checks: BTreeMap<String, String>,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store are healthy", body = HealthResponse),
        (status = 503, description = "Store is not answering", body = HealthResponse)
    )
)]
pub async fn health_check(State(server): State<AppointmentsServer>) -> (StatusCode, Json<HealthResponse>) {
    let store = server.store();
    let store_healthy = store.is_healthy().await;

    let mut checks = BTreeMap::new();
    checks.insert(
        "store".to_string(),
        if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
    );

    let (status_code, status) = if store_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let response = HealthResponse {
        status: status.to_string(),
        name: server.config.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        storage: store.backend().to_string(),
        checks,
    };

    (status_code, Json(response))
}
