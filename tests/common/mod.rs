#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use rusty_golf_rounds::db::{Database, RoundRepository};
use rusty_golf_rounds::storage::{KeyValueStore, StorageError};
use rusty_golf_rounds::{Hole, RoundDeletionHub};

pub const PARS: [u8; 18] = [4, 4, 3, 5, 4, 4, 3, 4, 5, 4, 3, 4, 5, 4, 4, 3, 4, 5];

pub fn hole_json(number: u8) -> Value {
    let par = PARS[usize::from(number - 1)];
    json!({
        "holeNumber": number,
        "par": par,
        "strokes": par + 1,
        "putts": 2,
    })
}

pub fn holes_json(count: u8) -> Vec<Value> {
    (1..=count).map(|n| hole_json(((n - 1) % 18) + 1)).collect()
}

pub fn round_json(hole_count: u8) -> Value {
    json!({
        "courseName": "Pebble Creek",
        "date": "2025-05-17",
        "holes": holes_json(hole_count),
    })
}

pub fn holes(count: u8) -> Vec<Hole> {
    (1..=count)
        .map(|n| {
            let par = PARS[usize::from(n - 1)];
            let mut hole = Hole::new(n, par, par);
            hole.putts = Some(2);
            hole
        })
        .collect()
}

/// Every call fails, as an unavailable device store would.
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::new("storage unavailable"))
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::new("storage unavailable"))
    }

    async fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::new("storage unavailable"))
    }
}

pub struct TestContext {
    pub dir: TempDir,
    pub db: Database,
    pub hub: RoundDeletionHub,
    pub repo: RoundRepository,
}

pub fn setup_test_context() -> Result<TestContext, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = Database::open(dir.path().join("rounds.sqlite"))?;
    let hub = RoundDeletionHub::new();
    let repo = RoundRepository::new(db.clone(), hub.clone());
    Ok(TestContext { dir, db, hub, repo })
}
