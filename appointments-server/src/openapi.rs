use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::paths;
use crate::server::AppointmentsServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,

        // Appointment endpoints
        crate::handlers::appointments::create_bulk_appointments,
        crate::handlers::appointments::find_appointments_by_reason,
        crate::handlers::appointments::delete_appointments_by_ssn,
        crate::handlers::appointments::get_latest_appointment,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,

            crate::handlers::appointments::CreateAppointmentRequest,
            crate::handlers::appointments::AppointmentDetailsRequest,
            crate::handlers::appointments::AppointmentDto,
            crate::handlers::appointments::PatientDto,
            crate::handlers::appointments::DeleteAppointmentsResponse,

            crate::error::ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service health"),
        (name = "appointments", description = "Bulk creation, search, deletion and latest lookup of patient appointments"),
    ),
    info(
        title = "Appointments API",
        version = "0.1.0",
        description = "Appointment management for doctors. Every appointment endpoint needs a bearer JWT carrying the `doctor` role.",
        license(name = "AGPL-3.0-only"),
    ),
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the appointment endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create OpenAPI documentation routes
pub fn create_docs_routes() -> Router<AppointmentsServer> {
    Router::new().merge(SwaggerUi::new(paths::docs::SWAGGER_UI).url(paths::docs::OPENAPI_JSON, ApiDoc::openapi()))
}
