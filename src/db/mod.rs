mod rounds;

pub use rounds::RoundRepository;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::AppError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rounds (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    course_name TEXT NOT NULL,
    round_date TEXT NOT NULL,
    tournament_id INTEGER,
    tournament_name TEXT,
    total_score INTEGER,
    total_putts INTEGER,
    fairways_hit INTEGER,
    greens_in_regulation INTEGER,
    is_finished INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S', 'now'))
);
CREATE INDEX IF NOT EXISTS rounds_tournament_idx ON rounds (tournament_id);
CREATE TABLE IF NOT EXISTS holes (
    round_id INTEGER NOT NULL,
    hole_number INTEGER NOT NULL,
    par INTEGER NOT NULL,
    strokes INTEGER NOT NULL,
    fairway_hit INTEGER,
    green_in_regulation INTEGER,
    putts INTEGER,
    notes TEXT,
    shot_data TEXT,
    PRIMARY KEY (round_id, hole_number),
    FOREIGN KEY (round_id) REFERENCES rounds(id) ON DELETE CASCADE
);
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// Shared handle to the app's SQLite database. Clones share one connection.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database file and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file cannot be opened or the schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opened round database");
        Self::init(conn)
    }

    /// # Errors
    ///
    /// Will return `Err` if the schema cannot be applied.
    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `op` against the shared connection on tokio's blocking pool.
    pub(crate) async fn interact<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, AppError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| AppError::Db("database connection lock poisoned".to_string()))?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| AppError::Other(e.to_string()))?
    }
}
