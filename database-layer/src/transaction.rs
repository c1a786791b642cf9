// Transaction management
use crate::connection::DatabasePool;
use crate::error::DatabaseResult;
use sqlx::{Postgres, Transaction};
use tracing::debug;

/// Access mode of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    ReadWrite,
    ReadOnly,
}

impl TransactionMode {
    pub fn is_read_only(self) -> bool {
        matches!(self, TransactionMode::ReadOnly)
    }
}

/// Opens transactions on a pool in the requested mode
#[derive(Clone)]
pub struct TransactionManager {
    pool: DatabasePool,
}

impl TransactionManager {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Begin a new transaction
    pub async fn begin(&self, mode: TransactionMode) -> DatabaseResult<Transaction<'static, Postgres>> {
        debug!(?mode, "Beginning transaction");

        // Acquire failures (pool timeout, refused connection) keep their sqlx kind
        let mut tx = self.pool.pool().begin().await?;

        if mode.is_read_only() {
            sqlx::query("SET TRANSACTION READ ONLY").execute(&mut *tx).await?;
        }

        Ok(tx)
    }
}
