use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use database_layer::DatabaseError;
use error_common::codes;
use logger_redacted::redact;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::AppointmentError;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking, repeated in the server log
    pub error_id: String,
    /// Error type
    #[schema(example = "not_found")]
    pub error_type: String,
    /// Stable machine-readable code
    #[schema(example = "NOT_FOUND_5001")]
    pub error_code: String,
    /// Human-readable error message
    #[schema(example = "Patient with SSN '123-45-6789' not found")]
    pub message: String,
    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    #[error("Authentication error: {message}")]
    Authentication { message: String, code: &'static str },

    #[error("Authorization error: {message}")]
    Authorization { message: String },

    /// `detail` is returned to the caller but never logged; serde messages quote the rejected value
    #[error("Bad request: {message}")]
    BadRequest { message: String, detail: String },

    #[error(transparent)]
    Appointment(#[from] AppointmentError),
}

impl ApiError {
    /// Create a validation error with field-specific errors
    pub fn validation_with_fields(
        message: impl Into<String>,
        field_errors: HashMap<String, Vec<String>>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    /// No credentials were presented
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: codes::authentication::MISSING_CREDENTIALS,
        }
    }

    /// Credentials were presented but could not be verified
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: codes::authentication::TOKEN_INVALID,
        }
    }

    /// Create an authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a bad request error; `detail` is shown to the caller only
    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Authorization { .. } => StatusCode::FORBIDDEN,
            ApiError::Appointment(err) => match err {
                AppointmentError::PatientNotFound { .. } | AppointmentError::NoAppointments { .. } => {
                    StatusCode::NOT_FOUND
                }
                AppointmentError::PatientConflict { .. } => StatusCode::CONFLICT,
                AppointmentError::Database(db_err) => database_status(db_err),
            },
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::Authorization { .. } => "authorization_error",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Appointment(err) => match err {
                AppointmentError::PatientNotFound { .. } | AppointmentError::NoAppointments { .. } => "not_found",
                AppointmentError::PatientConflict { .. } => "conflict",
                AppointmentError::Database(_) => "database_error",
            },
        }
    }

    /// Stable error code from [`error_common::codes`]
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => codes::validation::INVALID_INPUT,
            ApiError::BadRequest { .. } => codes::validation::INVALID_FORMAT,
            ApiError::Authentication { code, .. } => *code,
            ApiError::Authorization { .. } => codes::authorization::MISSING_ROLE,
            ApiError::Appointment(err) => match err {
                AppointmentError::PatientNotFound { .. } => codes::not_found::PATIENT_NOT_FOUND,
                AppointmentError::NoAppointments { .. } => codes::not_found::APPOINTMENT_NOT_FOUND,
                AppointmentError::PatientConflict { .. } => codes::conflict::PATIENT_CREATION_RACE,
                AppointmentError::Database(db_err) => database_code(db_err),
            },
        }
    }

    /// Message returned to the caller. Store failures are reported generically.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::Authentication { message, .. }
            | ApiError::Authorization { message } => message.clone(),
            ApiError::BadRequest { message, detail } => format!("{}: {}", message, detail),
            ApiError::Appointment(AppointmentError::Database(db_err)) => format_database_error(db_err),
            ApiError::Appointment(err) => err.to_string(),
        }
    }

    /// Message written to the log, with natural keys masked
    pub fn redacted(&self) -> String {
        match self {
            ApiError::Appointment(err) => err.redacted(),
            other => redact(&other.to_string()),
        }
    }
}

fn database_status(db_err: &DatabaseError) -> StatusCode {
    if db_err.is_connection_error() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn database_code(db_err: &DatabaseError) -> &'static str {
    if db_err.is_connection_error() {
        codes::database::CONNECTION_FAILED
    } else if db_err.is_unique_violation() {
        codes::database::CONSTRAINT_VIOLATION
    } else {
        codes::database::QUERY_FAILED
    }
}

/// Pretty format database errors without leaking query details
pub fn format_database_error(db_error: &DatabaseError) -> String {
    if db_error.is_connection_error() {
        return "The appointment store is unavailable. Try again in a few moments.".to_string();
    }
    if db_error.is_unique_violation() {
        return "A record with these details already exists.".to_string();
    }
    match db_error {
        DatabaseError::SqlxError(sqlx::Error::RowNotFound) => "Requested record not found.".to_string(),
        _ => "Database operation failed. Please try again.".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Log the error with correlation ID
        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self.redacted(),
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self.redacted(),
                "Request rejected"
            );
        }

        let field_errors = match &self {
            ApiError::Validation { field_errors, .. } => field_errors.clone(),
            _ => None,
        };

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            error_code: self.error_code().to_string(),
            message: self.public_message(),
            field_errors,
            timestamp: chrono::Utc::now(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Malformed, mistyped or wrongly encoded JSON bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid request body", rejection.body_text())
    }
}

/// Unparseable query strings
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("Invalid query string", rejection.body_text())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
