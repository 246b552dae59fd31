use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HOLES_PER_ROUND: usize = 18;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RoundId(pub i64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RoundId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hole {
    pub hole_number: u8,
    pub par: u8,
    pub strokes: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fairway_hit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green_in_regulation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub putts: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Serialized shot positions. Stored and returned untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_data: Option<String>,
}

impl Hole {
    #[must_use]
    pub fn new(hole_number: u8, par: u8, strokes: u8) -> Self {
        Self {
            hole_number,
            par,
            strokes,
            fairway_hit: None,
            green_in_regulation: None,
            putts: None,
            notes: None,
            shot_data: None,
        }
    }

    /// A hole with zero strokes has not been played yet.
    #[must_use]
    pub fn is_played(&self) -> bool {
        self.strokes > 0
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub course_name: String,
    pub date: NaiveDate,
    pub holes: Vec<Hole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_putts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fairways_hit: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greens_in_regulation: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_finished: Option<bool>,
}

/// The part of a round known before any hole has been played.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRound {
    pub course_name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StoredRound {
    pub id: RoundId,
    pub round: Round,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub id: RoundId,
    pub course_name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    pub is_finished: bool,
    pub holes_recorded: usize,
}
