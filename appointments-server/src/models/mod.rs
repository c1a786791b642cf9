//! Domain records shared by the repositories and the service layer

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A patient, identified externally by its SSN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub ssn: String,
    pub created_date: NaiveDateTime,
    pub modified_date: NaiveDateTime,
}

/// A stored appointment; the owning patient is referenced by id only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub reason: String,
    pub date: NaiveDateTime,
    pub created_date: NaiveDateTime,
    pub modified_date: NaiveDateTime,
}

/// Appointment joined with its owning patient, as returned by reason search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentWithPatient {
    pub appointment: Appointment,
    pub patient: Patient,
}

/// Reason and date of an appointment about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub reason: String,
    pub date: NaiveDateTime,
}

/// Validated input of a bulk creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAppointments {
    pub patient_name: String,
    pub ssn: String,
    pub details: Vec<NewAppointment>,
}
