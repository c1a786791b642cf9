// PostgreSQL-backed appointment store
use async_trait::async_trait;
use chrono::NaiveDateTime;
use database_layer::{DatabaseError, DatabasePool, DatabaseResult, TransactionManager, TransactionMode};
use sqlx::{FromRow, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{AppointmentStore, UnitOfWork};
use crate::models::{Appointment, AppointmentWithPatient, NewAppointment, Patient};

const APPOINTMENT_COLUMNS: &str = "a.id, a.patient_id, a.reason, a.date, a.created_date, a.modified_date";

/// Appointment store over a PostgreSQL pool
#[derive(Clone)]
pub struct PgAppointmentStore {
    transactions: TransactionManager,
}

impl PgAppointmentStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            transactions: TransactionManager::new(pool),
        }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn begin(&self, mode: TransactionMode) -> DatabaseResult<Box<dyn UnitOfWork>> {
        let tx = self.transactions.begin(mode).await?;
        Ok(Box::new(PgUnitOfWork { tx: Some(tx) }))
    }

    async fn is_healthy(&self) -> bool {
        self.transactions.pool().is_healthy().await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// One open transaction; rolled back on drop unless committed
pub struct PgUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitOfWork {
    fn tx(&mut self) -> DatabaseResult<&mut Transaction<'static, Postgres>> {
        self.tx.as_mut().ok_or(DatabaseError::TransactionClosed)
    }
}

/// Flat row of the appointment/patient join
#[derive(FromRow)]
struct AppointmentPatientRow {
    id: Uuid,
    patient_id: Uuid,
    reason: String,
    date: NaiveDateTime,
    created_date: NaiveDateTime,
    modified_date: NaiveDateTime,
    patient_name: String,
    patient_ssn: String,
    patient_created_date: NaiveDateTime,
    patient_modified_date: NaiveDateTime,
}

impl From<AppointmentPatientRow> for AppointmentWithPatient {
    fn from(row: AppointmentPatientRow) -> Self {
        Self {
            appointment: Appointment {
                id: row.id,
                patient_id: row.patient_id,
                reason: row.reason,
                date: row.date,
                created_date: row.created_date,
                modified_date: row.modified_date,
            },
            patient: Patient {
                id: row.patient_id,
                name: row.patient_name,
                ssn: row.patient_ssn,
                created_date: row.patient_created_date,
                modified_date: row.patient_modified_date,
            },
        }
    }
}

/// Escape LIKE metacharacters so the keyword is matched literally
pub(crate) fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_patient_by_ssn(&mut self, ssn: &str) -> DatabaseResult<Option<Patient>> {
        let tx = self.tx()?;
        let patient = sqlx::query_as::<_, Patient>(
            "SELECT id, name, ssn, created_date, modified_date FROM patient WHERE ssn = $1",
        )
        .bind(ssn)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(patient)
    }

    async fn insert_patient_if_absent(&mut self, name: &str, ssn: &str) -> DatabaseResult<Option<Patient>> {
        let tx = self.tx()?;
        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patient (name, ssn)
            VALUES ($1, $2)
            ON CONFLICT (ssn) DO NOTHING
            RETURNING id, name, ssn, created_date, modified_date
            "#,
        )
        .bind(name)
        .bind(ssn)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(patient)
    }

    async fn insert_appointments(
        &mut self,
        patient_id: Uuid,
        details: &[NewAppointment],
    ) -> DatabaseResult<Vec<Appointment>> {
        let tx = self.tx()?;
        let mut created = Vec::with_capacity(details.len());
        for detail in details {
            let appointment = sqlx::query_as::<_, Appointment>(
                r#"
                INSERT INTO appointment (reason, date, patient_id)
                VALUES ($1, $2, $3)
                RETURNING id, patient_id, reason, date, created_date, modified_date
                "#,
            )
            .bind(&detail.reason)
            .bind(detail.date)
            .bind(patient_id)
            .fetch_one(&mut **tx)
            .await?;
            created.push(appointment);
        }
        debug!(%patient_id, count = created.len(), "Inserted appointments");
        Ok(created)
    }

    async fn find_by_reason_with_patient(&mut self, keyword: &str) -> DatabaseResult<Vec<AppointmentWithPatient>> {
        let tx = self.tx()?;
        let sql = format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS},
                   p.name AS patient_name,
                   p.ssn AS patient_ssn,
                   p.created_date AS patient_created_date,
                   p.modified_date AS patient_modified_date
            FROM appointment a
            JOIN patient p ON p.id = a.patient_id
            WHERE a.reason ILIKE $1 ESCAPE '\'
            ORDER BY a.date, a.id
            "#
        );
        let rows = sqlx::query_as::<_, AppointmentPatientRow>(&sql)
            .bind(format!("%{}%", escape_like(keyword)))
            .fetch_all(&mut **tx)
            .await?;
        Ok(rows.into_iter().map(AppointmentWithPatient::from).collect())
    }

    async fn delete_by_patient_ssn(&mut self, ssn: &str) -> DatabaseResult<u64> {
        let tx = self.tx()?;
        let result = sqlx::query(
            r#"
            DELETE FROM appointment a
            USING patient p
            WHERE a.patient_id = p.id AND p.ssn = $1
            "#,
        )
        .bind(ssn)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn find_latest_by_patient_ssn(&mut self, ssn: &str) -> DatabaseResult<Option<Appointment>> {
        let tx = self.tx()?;
        let sql = format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointment a
            JOIN patient p ON p.id = a.patient_id
            WHERE p.ssn = $1
            ORDER BY a.date DESC
            LIMIT 1
            "#
        );
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(ssn)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(appointment)
    }

    async fn commit(&mut self) -> DatabaseResult<()> {
        let tx = self.tx.take().ok_or(DatabaseError::TransactionClosed)?;
        tx.commit().await?;
        Ok(())
    }
}
