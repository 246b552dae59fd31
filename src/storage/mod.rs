mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteKvStore;

use async_trait::async_trait;
use thiserror::Error;

/// The backing store could not be read or written.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::new(value.to_string())
    }
}

/// String key-value storage for small app state (onboarding flag, settings).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
