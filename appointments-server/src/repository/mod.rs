//! Data access for patients and appointments
//!
//! The service layer talks to an [`AppointmentStore`], which hands out one
//! [`UnitOfWork`] per operation. Everything done through a unit of work is
//! committed together by [`UnitOfWork::commit`]; dropping it without a commit
//! discards the work.

use async_trait::async_trait;
use database_layer::{DatabaseResult, TransactionMode};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentWithPatient, NewAppointment, Patient};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAppointmentStore;
pub use postgres::PgAppointmentStore;

/// Source of units of work
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Open a unit of work. Writes fail in [`TransactionMode::ReadOnly`].
    async fn begin(&self, mode: TransactionMode) -> DatabaseResult<Box<dyn UnitOfWork>>;

    /// Whether the backing store answers a trivial query
    async fn is_healthy(&self) -> bool;

    /// Short backend name for health output
    fn backend(&self) -> &'static str;
}

/// Queries and writes executed inside one transaction
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_patient_by_ssn(&mut self, ssn: &str) -> DatabaseResult<Option<Patient>>;

    /// Insert a patient unless one with `ssn` already exists.
    /// Returns `None` when another writer got there first.
    async fn insert_patient_if_absent(&mut self, name: &str, ssn: &str) -> DatabaseResult<Option<Patient>>;

    /// Insert appointments for a patient, in input order
    async fn insert_appointments(
        &mut self,
        patient_id: Uuid,
        details: &[NewAppointment],
    ) -> DatabaseResult<Vec<Appointment>>;

    /// Appointments whose reason contains `keyword`, case-insensitively, joined with their patient
    async fn find_by_reason_with_patient(&mut self, keyword: &str) -> DatabaseResult<Vec<AppointmentWithPatient>>;

    /// Delete every appointment of the patient with `ssn`; returns the number removed
    async fn delete_by_patient_ssn(&mut self, ssn: &str) -> DatabaseResult<u64>;

    /// The patient's appointment with the greatest date
    async fn find_latest_by_patient_ssn(&mut self, ssn: &str) -> DatabaseResult<Option<Appointment>>;

    async fn commit(&mut self) -> DatabaseResult<()>;
}
