// In-memory appointment store for local runs and tests
use std::sync::Arc;

use async_trait::async_trait;
use database_layer::{DatabaseError, DatabaseResult, TransactionMode};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{AppointmentStore, UnitOfWork};
use crate::models::{Appointment, AppointmentWithPatient, NewAppointment, Patient};
use crate::utils::timestamps::now_local;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
}

/// Appointment store kept in process memory
///
/// Units of work are serialized: each holds the store lock until it is
/// committed or dropped, and stages its changes on a private copy.
#[derive(Clone, Default)]
pub struct InMemoryAppointmentStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn patient_count(&self) -> usize {
        self.state.lock().await.patients.len()
    }

    pub async fn appointment_count(&self) -> usize {
        self.state.lock().await.appointments.len()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn begin(&self, mode: TransactionMode) -> DatabaseResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard: Some(guard),
            working,
            mode,
        }))
    }

    async fn is_healthy(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

struct MemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    working: MemoryState,
    mode: TransactionMode,
}

impl MemoryUnitOfWork {
    fn ensure_open(&self) -> DatabaseResult<()> {
        if self.guard.is_none() {
            return Err(DatabaseError::TransactionClosed);
        }
        Ok(())
    }

    fn ensure_writable(&self) -> DatabaseResult<()> {
        self.ensure_open()?;
        if self.mode.is_read_only() {
            return Err(DatabaseError::ReadOnlyTransaction);
        }
        Ok(())
    }

    fn patient_id_by_ssn(&self, ssn: &str) -> Option<Uuid> {
        self.working.patients.iter().find(|p| p.ssn == ssn).map(|p| p.id)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_patient_by_ssn(&mut self, ssn: &str) -> DatabaseResult<Option<Patient>> {
        self.ensure_open()?;
        Ok(self.working.patients.iter().find(|p| p.ssn == ssn).cloned())
    }

    async fn insert_patient_if_absent(&mut self, name: &str, ssn: &str) -> DatabaseResult<Option<Patient>> {
        self.ensure_writable()?;
        if self.patient_id_by_ssn(ssn).is_some() {
            return Ok(None);
        }
        let now = now_local();
        let patient = Patient {
            id: Uuid::new_v4(),
            name: name.to_string(),
            ssn: ssn.to_string(),
            created_date: now,
            modified_date: now,
        };
        self.working.patients.push(patient.clone());
        Ok(Some(patient))
    }

    async fn insert_appointments(
        &mut self,
        patient_id: Uuid,
        details: &[NewAppointment],
    ) -> DatabaseResult<Vec<Appointment>> {
        self.ensure_writable()?;
        if !self.working.patients.iter().any(|p| p.id == patient_id) {
            return Err(DatabaseError::QueryFailed(format!(
                "appointment references unknown patient {}",
                patient_id
            )));
        }

        let now = now_local();
        let created: Vec<Appointment> = details
            .iter()
            .map(|detail| Appointment {
                id: Uuid::new_v4(),
                patient_id,
                reason: detail.reason.clone(),
                date: detail.date,
                created_date: now,
                modified_date: now,
            })
            .collect();
        self.working.appointments.extend(created.iter().cloned());
        Ok(created)
    }

    async fn find_by_reason_with_patient(&mut self, keyword: &str) -> DatabaseResult<Vec<AppointmentWithPatient>> {
        self.ensure_open()?;
        let needle = keyword.to_lowercase();
        let mut found: Vec<AppointmentWithPatient> = self
            .working
            .appointments
            .iter()
            .filter(|a| a.reason.to_lowercase().contains(&needle))
            .filter_map(|a| {
                self.working
                    .patients
                    .iter()
                    .find(|p| p.id == a.patient_id)
                    .map(|p| AppointmentWithPatient {
                        appointment: a.clone(),
                        patient: p.clone(),
                    })
            })
            .collect();
        found.sort_by(|l, r| {
            l.appointment
                .date
                .cmp(&r.appointment.date)
                .then_with(|| l.appointment.id.cmp(&r.appointment.id))
        });
        Ok(found)
    }

    async fn delete_by_patient_ssn(&mut self, ssn: &str) -> DatabaseResult<u64> {
        self.ensure_writable()?;
        let Some(patient_id) = self.patient_id_by_ssn(ssn) else {
            return Ok(0);
        };
        let before = self.working.appointments.len();
        self.working.appointments.retain(|a| a.patient_id != patient_id);
        Ok((before - self.working.appointments.len()) as u64)
    }

    async fn find_latest_by_patient_ssn(&mut self, ssn: &str) -> DatabaseResult<Option<Appointment>> {
        self.ensure_open()?;
        let Some(patient_id) = self.patient_id_by_ssn(ssn) else {
            return Ok(None);
        };
        Ok(self
            .working
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .max_by_key(|a| a.date)
            .cloned())
    }

    async fn commit(&mut self) -> DatabaseResult<()> {
        let mut guard = self.guard.take().ok_or(DatabaseError::TransactionClosed)?;
        *guard = std::mem::take(&mut self.working);
        Ok(())
    }
}
