use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};

use super::{KeyValueStore, StorageError};
use crate::db::Database;
use crate::error::AppError;

/// Key-value pairs in the `kv_store` table of the app database.
#[derive(Clone, Debug)]
pub struct SqliteKvStore {
    db: Database,
}

impl SqliteKvStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        self.db
            .interact(move |conn| op(conn).map_err(AppError::from))
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map(|_| ())
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
                .map(|_| ())
        })
        .await
    }
}
