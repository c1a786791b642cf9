//! Route path constants
//!
//! utoipa `#[utoipa::path(...)]` attributes need string literals, so the
//! handler annotations repeat these values. Keep the two in sync.

/// Prefix of the appointment API
pub const API: &str = "/api";

/// Health check endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
}

/// Appointment endpoints, relative to [`super::API`]
pub mod appointments {
    /// GET searches by reason, DELETE removes a patient's appointments
    pub const APPOINTMENTS: &str = "/appointments";
    pub const BULK: &str = "/appointments/bulk";
    pub const LATEST: &str = "/appointments/latest";
}

/// OpenAPI document and Swagger UI
pub mod docs {
    pub const SWAGGER_UI: &str = "/swagger-ui";
    pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
}
