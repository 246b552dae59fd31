use crate::model::{HOLES_PER_ROUND, RoundId};
use crate::storage::StorageError;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("round {round} has {recorded} of {HOLES_PER_ROUND} holes recorded")]
    Incomplete { round: RoundId, recorded: usize },
    #[error("round {round} lists hole {hole_number} more than once")]
    DuplicateHole { round: RoundId, hole_number: u8 },
    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}
