use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::middleware::{AuthContext, DOCTOR_ROLE};
use crate::models::{Appointment, AppointmentWithPatient, CreateAppointments, NewAppointment, Patient};
use crate::server::AppointmentsServer;
use crate::validation::{required_param, FieldErrors, RequestValidation};
use crate::{validate_field, validate_required};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One appointment of a bulk creation
#[derive(Debug, Deserialize, ToSchema)]
pub struct AppointmentDetailsRequest {
    #[serde(default)]
    #[schema(example = "Checkup")]
    pub reason: Option<String>,
    #[serde(default, with = "crate::utils::timestamps::option")]
    #[schema(value_type = Option<String>, example = "2025-06-01T12:00:00")]
    pub date: Option<NaiveDateTime>,
}

/// Bulk creation request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    #[schema(example = "John Doe")]
    pub patient_name: Option<String>,
    #[serde(default)]
    #[schema(example = "123-45-6789")]
    pub ssn: Option<String>,
    #[serde(default)]
    pub appointment_details: Option<Vec<AppointmentDetailsRequest>>,
}

impl RequestValidation for CreateAppointmentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();

        validate_required!(
            errors,
            "patientName",
            self.patient_name.as_deref().unwrap_or_default(),
            "Patient name must not be blank"
        );
        validate_required!(
            errors,
            "ssn",
            self.ssn.as_deref().unwrap_or_default(),
            "SSN must not be blank"
        );

        let details = self.appointment_details.as_deref().unwrap_or_default();
        validate_field!(
            errors,
            "appointmentDetails",
            !details.is_empty(),
            "Appointment details list must not be empty"
        );
        for (index, detail) in details.iter().enumerate() {
            validate_field!(
                errors,
                format!("appointmentDetails[{}].date", index),
                detail.date.is_some(),
                "Date must not be null"
            );
            validate_required!(
                errors,
                format!("appointmentDetails[{}].reason", index),
                detail.reason.as_deref().unwrap_or_default(),
                "Reason must not be blank"
            );
        }

        errors.into_result()
    }
}

impl CreateAppointmentRequest {
    /// Convert a validated request; name and SSN are trimmed like the query parameters
    fn into_command(self) -> CreateAppointments {
        CreateAppointments {
            patient_name: self.patient_name.unwrap_or_default().trim().to_string(),
            ssn: self.ssn.unwrap_or_default().trim().to_string(),
            details: self
                .appointment_details
                .unwrap_or_default()
                .into_iter()
                .filter_map(|detail| {
                    Some(NewAppointment {
                        reason: detail.reason?,
                        date: detail.date?,
                    })
                })
                .collect(),
        }
    }
}

/// Patient summary embedded in search results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientDto {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "123-45-6789")]
    pub ssn: String,
}

impl From<Patient> for PatientDto {
    fn from(patient: Patient) -> Self {
        Self {
            name: patient.name,
            ssn: patient.ssn,
        }
    }
}

/// Appointment as returned by the API; `patient` is only set by reason search
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDto {
    pub id: Uuid,
    #[schema(example = "Checkup")]
    pub reason: String,
    #[serde(with = "crate::utils::timestamps")]
    #[schema(value_type = String, example = "2025-06-01T12:00:00")]
    pub date: NaiveDateTime,
    pub patient: Option<PatientDto>,
}

impl From<Appointment> for AppointmentDto {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            reason: appointment.reason,
            date: appointment.date,
            patient: None,
        }
    }
}

impl From<AppointmentWithPatient> for AppointmentDto {
    fn from(found: AppointmentWithPatient) -> Self {
        Self {
            patient: Some(PatientDto::from(found.patient)),
            ..Self::from(found.appointment)
        }
    }
}

/// Result of deleting a patient's appointments
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAppointmentsResponse {
    #[schema(example = 2)]
    pub deleted_count: u64,
    #[schema(example = "222-33-4444")]
    pub ssn: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReasonQuery {
    /// Reason to match exactly, ignoring case and surrounding whitespace
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SsnQuery {
    /// Patient SSN; surrounding whitespace is ignored
    pub ssn: Option<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Create several appointments for one patient
///
/// The patient is created on first use of its SSN and reused afterwards.
#[utoipa::path(
    post,
    path = "/api/appointments/bulk",
    tag = "appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 200, description = "Appointments created, in request order", body = Vec<AppointmentDto>),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a doctor", body = ApiErrorResponse),
        (status = 409, description = "Patient created concurrently", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_bulk_appointments(
    State(server): State<AppointmentsServer>,
    auth: AuthContext,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<AppointmentDto>>> {
    auth.require_role(DOCTOR_ROLE)?;
    let Json(request) = payload?;
    request.validate()?;

    let created = server
        .service
        .create_bulk_appointments(request.into_command())
        .await?;

    Ok(Json(created.into_iter().map(AppointmentDto::from).collect()))
}

/// Find appointments by reason
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "appointments",
    params(ReasonQuery),
    responses(
        (status = 200, description = "Matching appointments with their patient", body = Vec<AppointmentDto>),
        (status = 400, description = "Blank reason", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a doctor", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn find_appointments_by_reason(
    State(server): State<AppointmentsServer>,
    auth: AuthContext,
    query: Result<Query<ReasonQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AppointmentDto>>> {
    auth.require_role(DOCTOR_ROLE)?;
    let Query(query) = query?;
    let reason = required_param(query.reason.as_deref(), "reason", "Reason must not be blank")?;

    let found = server.service.find_appointments_by_reason(&reason).await?;

    Ok(Json(found.into_iter().map(AppointmentDto::from).collect()))
}

/// Delete all appointments of a patient
#[utoipa::path(
    delete,
    path = "/api/appointments",
    tag = "appointments",
    params(SsnQuery),
    responses(
        (status = 200, description = "Appointments deleted", body = DeleteAppointmentsResponse),
        (status = 400, description = "Blank SSN", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a doctor", body = ApiErrorResponse),
        (status = 404, description = "Unknown patient", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_appointments_by_ssn(
    State(server): State<AppointmentsServer>,
    auth: AuthContext,
    query: Result<Query<SsnQuery>, QueryRejection>,
) -> ApiResult<Json<DeleteAppointmentsResponse>> {
    auth.require_role(DOCTOR_ROLE)?;
    let Query(query) = query?;
    let ssn = required_param(query.ssn.as_deref(), "ssn", "SSN must not be blank")?;

    let deleted_count = server.service.delete_appointments_for_patient(&ssn).await?;

    Ok(Json(DeleteAppointmentsResponse { deleted_count, ssn }))
}

/// Latest appointment of a patient
#[utoipa::path(
    get,
    path = "/api/appointments/latest",
    tag = "appointments",
    params(SsnQuery),
    responses(
        (status = 200, description = "Appointment with the most recent date", body = AppointmentDto),
        (status = 400, description = "Blank SSN", body = ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ApiErrorResponse),
        (status = 403, description = "Caller is not a doctor", body = ApiErrorResponse),
        (status = 404, description = "Unknown patient or no appointments", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_latest_appointment(
    State(server): State<AppointmentsServer>,
    auth: AuthContext,
    query: Result<Query<SsnQuery>, QueryRejection>,
) -> ApiResult<Json<AppointmentDto>> {
    auth.require_role(DOCTOR_ROLE)?;
    let Query(query) = query?;
    let ssn = required_param(query.ssn.as_deref(), "ssn", "SSN must not be blank")?;

    let latest = server.service.get_latest_appointment_for_patient(&ssn).await?;

    Ok(Json(AppointmentDto::from(latest)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CreateAppointmentRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_request_converts_in_order() {
        let request = parse(
            r#"{
                "ssn": " 123-45-6789 ",
                "patientName": "John Doe",
                "appointmentDetails": [
                    { "reason": "Checkup", "date": "2025-06-01T12:00:00" },
                    { "reason": "Follow-up", "date": "2025-06-01T11:00:00" }
                ]
            }"#,
        );
        request.validate().unwrap();

        let command = request.into_command();
        assert_eq!(command.ssn, "123-45-6789");
        assert_eq!(command.details.len(), 2);
        assert_eq!(command.details[1].reason, "Follow-up");
    }

    #[test]
    fn test_every_violation_is_reported() {
        let request = parse(
            r#"{
                "ssn": "  ",
                "appointmentDetails": [ { "reason": "" } ]
            }"#,
        );
        match request.validate() {
            Err(ApiError::Validation { message, field_errors }) => {
                assert_eq!(message, "Patient name must not be blank");
                let field_errors = field_errors.unwrap();
                assert!(field_errors.contains_key("patientName"));
                assert!(field_errors.contains_key("ssn"));
                assert!(field_errors.contains_key("appointmentDetails[0].date"));
                assert!(field_errors.contains_key("appointmentDetails[0].reason"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_details_rejected() {
        let request = parse(r#"{ "ssn": "1", "patientName": "A", "appointmentDetails": [] }"#);
        let err = request.validate().unwrap_err();
        assert_eq!(err.public_message(), "Appointment details list must not be empty");

        let request = parse(r#"{ "ssn": "1", "patientName": "A" }"#);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_bad_date_format_fails_to_parse() {
        let result = serde_json::from_str::<CreateAppointmentRequest>(
            r#"{ "ssn": "1", "patientName": "A", "appointmentDetails": [ { "reason": "x", "date": "2025-06-01T12:00:00.500Z" } ] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_dto_patient_is_null_without_join() {
        let now = crate::utils::timestamps::parse("2025-08-05T09:30:00").unwrap();
        let dto = AppointmentDto::from(Appointment {
            id: Uuid::nil(),
            patient_id: Uuid::nil(),
            reason: "Follow-up".into(),
            date: now,
            created_date: now,
            modified_date: now,
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["date"], "2025-08-05T09:30:00");
        assert!(json["patient"].is_null());
        assert!(json.as_object().unwrap().contains_key("patient"));
    }
}
