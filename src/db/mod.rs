use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::models::Client;

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{Database, MIGRATOR};

/// Failures reported by a client store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The database rejected the write because of an integrity rule
    #[error("constraint violation: {}", .0.join(", "))]
    ConstraintViolation(Vec<String>),

    /// Any other persistence failure; carries the most specific cause
    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let sqlx::Error::Database(db_err) = &err else {
            return Self::Storage(err.to_string());
        };

        let mut message = db_err.message().to_string();
        if let Some(detail) = db_err
            .try_downcast_ref::<PgDatabaseError>()
            .and_then(|pg| pg.detail())
        {
            message = format!("{message} ({detail})");
        }

        match db_err.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => Self::ConstraintViolation(vec![message]),
            _ => Self::Storage(message),
        }
    }
}

/// Persistence operations the HTTP layer needs.
///
/// `find_by_id` reports a missing row as `Ok(None)`. `save` inserts when the
/// client is new (`id == 0`) and updates the row with that id otherwise,
/// returning the stored row either way.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn find_all(&self) -> StoreResult<Vec<Client>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Client>>;
    async fn save(&self, client: Client) -> StoreResult<Client>;
    async fn delete_by_id(&self, id: i64) -> StoreResult<()>;
}

/// Initialize the configured client store
pub async fn init(config: &Config, in_memory: bool) -> Result<Arc<dyn ClientStore>> {
    if in_memory {
        info!("Using in-memory client store");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let db = Database::new(config).await?;
    info!("Database connection established");

    if config.run_migrations {
        db.migrate().await?;
        info!("Migrations applied");
    }

    Ok(Arc::new(db))
}
