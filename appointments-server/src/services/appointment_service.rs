//! Appointment use cases: bulk creation, reason search, deletion and latest lookup

use std::sync::Arc;

use database_layer::{DatabaseError, TransactionMode};
use logger_redacted::{redact, redact_key, MaskedSsn};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Appointment, AppointmentWithPatient, CreateAppointments, Patient};
use crate::repository::{AppointmentStore, UnitOfWork};

/// Errors raised by [`AppointmentService`]
#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Patient with SSN '{ssn}' not found")]
    PatientNotFound { ssn: String },

    #[error("No appointments found for SSN '{ssn}'")]
    NoAppointments { ssn: String },

    #[error("Patient with SSN '{ssn}' is being created concurrently and could not be resolved")]
    PatientConflict { ssn: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl AppointmentError {
    /// SSN the error refers to, if any
    pub fn ssn(&self) -> Option<&str> {
        match self {
            AppointmentError::PatientNotFound { ssn }
            | AppointmentError::NoAppointments { ssn }
            | AppointmentError::PatientConflict { ssn } => Some(ssn),
            AppointmentError::Database(_) => None,
        }
    }

    /// Error message safe for log output
    pub fn redacted(&self) -> String {
        match self.ssn() {
            Some(ssn) => redact_key(&self.to_string(), ssn),
            None => redact(&self.to_string()),
        }
    }
}

pub type AppointmentResult<T> = Result<T, AppointmentError>;

/// Orchestrates appointment operations over an [`AppointmentStore`]
#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn AppointmentStore>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn AppointmentStore> {
        &self.store
    }

    /// Create all appointments of `request` for one patient, creating the
    /// patient on first use. Nothing is persisted unless everything is.
    pub async fn create_bulk_appointments(&self, request: CreateAppointments) -> AppointmentResult<Vec<Appointment>> {
        let mut uow = self.store.begin(TransactionMode::ReadWrite).await?;

        let patient = resolve_patient(uow.as_mut(), &request.patient_name, &request.ssn).await?;
        let created = uow.insert_appointments(patient.id, &request.details).await?;
        uow.commit().await?;

        info!(
            ssn = %MaskedSsn(&request.ssn),
            patient_id = %patient.id,
            count = created.len(),
            "Created appointments"
        );
        Ok(created)
    }

    /// Appointments whose reason equals `keyword` ignoring case, with their patient
    pub async fn find_appointments_by_reason(&self, keyword: &str) -> AppointmentResult<Vec<AppointmentWithPatient>> {
        let keyword = keyword.trim();
        let mut uow = self.store.begin(TransactionMode::ReadOnly).await?;
        let candidates = uow.find_by_reason_with_patient(keyword).await?;
        uow.commit().await?;

        let wanted = keyword.to_lowercase();
        let matches: Vec<AppointmentWithPatient> = candidates
            .into_iter()
            .filter(|c| c.appointment.reason.to_lowercase() == wanted)
            .collect();

        debug!(count = matches.len(), "Reason search finished");
        Ok(matches)
    }

    /// Delete every appointment of the patient with `ssn`; the patient stays
    pub async fn delete_appointments_for_patient(&self, ssn: &str) -> AppointmentResult<u64> {
        let mut uow = self.store.begin(TransactionMode::ReadWrite).await?;

        let patient = uow
            .find_patient_by_ssn(ssn)
            .await?
            .ok_or_else(|| AppointmentError::PatientNotFound { ssn: ssn.to_string() })?;
        let deleted = uow.delete_by_patient_ssn(ssn).await?;
        uow.commit().await?;

        info!(
            ssn = %MaskedSsn(ssn),
            patient_id = %patient.id,
            deleted,
            "Deleted appointments"
        );
        Ok(deleted)
    }

    /// The appointment with the greatest date for the patient with `ssn`
    pub async fn get_latest_appointment_for_patient(&self, ssn: &str) -> AppointmentResult<Appointment> {
        let mut uow = self.store.begin(TransactionMode::ReadOnly).await?;

        if uow.find_patient_by_ssn(ssn).await?.is_none() {
            return Err(AppointmentError::PatientNotFound { ssn: ssn.to_string() });
        }
        let latest = uow
            .find_latest_by_patient_ssn(ssn)
            .await?
            .ok_or_else(|| AppointmentError::NoAppointments { ssn: ssn.to_string() })?;
        uow.commit().await?;

        Ok(latest)
    }
}

/// Find the patient with `ssn`, creating it with `name` if absent.
///
/// A concurrent creator can win between the lookup and the insert; the
/// patient is then looked up once more. If it is still missing the
/// operation fails with [`AppointmentError::PatientConflict`].
async fn resolve_patient(uow: &mut dyn UnitOfWork, name: &str, ssn: &str) -> AppointmentResult<Patient> {
    if let Some(existing) = uow.find_patient_by_ssn(ssn).await? {
        debug!(patient_id = %existing.id, "Reusing existing patient");
        return Ok(existing);
    }

    if let Some(created) = uow.insert_patient_if_absent(name, ssn).await? {
        info!(patient_id = %created.id, ssn = %MaskedSsn(ssn), "Created patient");
        return Ok(created);
    }

    warn!(ssn = %MaskedSsn(ssn), "Patient created concurrently, re-reading");
    uow.find_patient_by_ssn(ssn)
        .await?
        .ok_or_else(|| AppointmentError::PatientConflict { ssn: ssn.to_string() })
}
