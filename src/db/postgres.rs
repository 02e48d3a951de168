use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::db::{ClientStore, StoreError, StoreResult};
use crate::models::Client;

/// Schema migrations embedded from `migrations/`
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

const COLUMNS: &str = "id, name, surname, email, created_at";

/// PostgreSQL-backed client store
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let url = config.database_url()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(url)
            .await
            .context("connect to postgres")?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .context("apply clients migrations")?;
        Ok(())
    }

    async fn insert(&self, client: &Client) -> StoreResult<Client> {
        let query = format!(
            "INSERT INTO clients (name, surname, email, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Client>(&query)
            .bind(&client.name)
            .bind(&client.surname)
            .bind(&client.email)
            .bind(client.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(&self, client: &Client) -> StoreResult<Client> {
        let query = format!(
            "UPDATE clients SET name = $1, surname = $2, email = $3 \
             WHERE id = $4 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Client>(&query)
            .bind(&client.name)
            .bind(&client.surname)
            .bind(&client.email)
            .bind(client.id)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or_else(|| StoreError::storage(format!("no client row with id {}", client.id)))
    }
}

#[async_trait]
impl ClientStore for Database {
    async fn find_all(&self) -> StoreResult<Vec<Client>> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY id ASC");
        let clients = sqlx::query_as::<_, Client>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Client>> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        let client = sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    async fn save(&self, client: Client) -> StoreResult<Client> {
        if client.is_new() {
            self.insert(&client).await
        } else {
            self.update(&client).await
        }
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
