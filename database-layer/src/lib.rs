//! PostgreSQL access for the appointments service
//!
//! - [`DatabasePool`]: pooled connections built from [`PoolSettings`], with a
//!   `SELECT 1` health probe
//! - [`TransactionManager`]: opens read-write or read-only transactions
//! - [`MIGRATOR`]: the embedded schema migrations under `migrations/`
//!
//! ```rust,no_run
//! use database_layer::{DatabasePool, PoolSettings, TransactionManager, TransactionMode};
//!
//! # async fn run() -> database_layer::DatabaseResult<()> {
//! let pool = DatabasePool::new(&PoolSettings::default()).await?;
//! pool.migrate().await?;
//!
//! let tx = TransactionManager::new(pool).begin(TransactionMode::ReadOnly).await?;
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod transaction;

pub use connection::*;
pub use error::*;
pub use transaction::*;

/// Schema migrations embedded at compile time
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
