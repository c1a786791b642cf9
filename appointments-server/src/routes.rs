use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{appointments, health},
    openapi,
    server::AppointmentsServer,
};

pub mod paths;

/// Create health check routes
pub fn health_routes() -> Router<AppointmentsServer> {
    Router::new().route(paths::health::HEALTH, get(health::health_check))
}

/// Create appointment routes (doctor role required)
pub fn appointment_routes() -> Router<AppointmentsServer> {
    Router::new()
        .route(
            paths::appointments::APPOINTMENTS,
            get(appointments::find_appointments_by_reason).delete(appointments::delete_appointments_by_ssn),
        )
        .route(paths::appointments::BULK, post(appointments::create_bulk_appointments))
        .route(paths::appointments::LATEST, get(appointments::get_latest_appointment))
}

/// Create all routes
pub fn create_routes() -> Router<AppointmentsServer> {
    Router::new()
        // Health check routes (no authentication required)
        .merge(health_routes())
        // API documentation routes
        .merge(openapi::create_docs_routes())
        // Appointment routes (authentication required)
        .nest(paths::API, appointment_routes())
}
