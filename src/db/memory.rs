use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::{ClientStore, StoreError, StoreResult};
use crate::models::Client;

/// Client store kept in process memory.
///
/// Mirrors the relational store closely enough for tests and local runs:
/// ids come from a counter and are never reused, and emails are unique.
#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug)]
struct Tables {
    next_id: i64,
    clients: BTreeMap<i64, Client>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables {
                next_id: 1,
                clients: BTreeMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    fn email_taken(&self, email: &str, except_id: i64) -> bool {
        self.clients
            .values()
            .any(|c| c.id != except_id && c.email == email)
    }
}

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<Client>> {
        Ok(self.inner.read().clients.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Client>> {
        Ok(self.inner.read().clients.get(&id).cloned())
    }

    async fn save(&self, mut client: Client) -> StoreResult<Client> {
        let mut tables = self.inner.write();

        if tables.email_taken(&client.email, client.id) {
            return Err(StoreError::ConstraintViolation(vec![format!(
                "duplicate key value violates unique constraint \"clients_email_key\" \
                 (Key (email)=({}) already exists.)",
                client.email
            )]));
        }

        if client.is_new() {
            client.id = tables.next_id;
            tables.next_id += 1;
        } else if let Some(existing) = tables.clients.get(&client.id) {
            client.created_at = existing.created_at;
        } else {
            return Err(StoreError::storage(format!(
                "no client row with id {}",
                client.id
            )));
        }

        tables.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        self.inner.write().clients.remove(&id);
        Ok(())
    }
}
