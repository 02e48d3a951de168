use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A client as stored in the `clients` table.
///
/// A client that has not been persisted yet carries `id == 0`; the store
/// assigns the real id on insert.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: NaiveDate,
}

impl Client {
    /// A new, unsaved client stamped with today's date.
    pub fn new(name: String, surname: String, email: String) -> Self {
        Self {
            id: 0,
            name,
            surname,
            email,
            created_at: chrono::Local::now().date_naive(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
