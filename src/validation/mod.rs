//! Shape and range checks for hole and round records.
//!
//! Input is an untyped [`serde_json::Value`] (form data, an import file, a row read back
//! from storage). Fields are checked in declaration order and every failing field is
//! reported; the `safe_*` variants never fail and surface only the first issue.

mod fields;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::model::{CreateRound, HOLES_PER_ROUND, Hole, Round};
use fields::{Bounds, Checker, Length, narrow};

const HOLE_NUMBER: Bounds = Bounds::new(1, 18);
const PAR: Bounds = Bounds::new(3, 5);
const STROKES: Bounds = Bounds::new(0, 20);
const PUTTS: Bounds = Bounds::new(0, 10);
const FAIRWAYS_HIT: Bounds = Bounds::new(0, 14);
const GREENS_IN_REGULATION: Bounds = Bounds::new(0, 18);

const NOTES: Length = Length::at_most(500);
const COURSE_NAME: Length = Length::new(1, 100);
const TOURNAMENT_NAME: Length = Length::new(1, 100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted field path, e.g. `holes[3].par`. Empty for the record itself.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// One or more field-level issues. Never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed: {}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    fn from_issues(issues: Vec<ValidationIssue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    #[must_use]
    pub fn first(&self) -> &ValidationIssue {
        &self.issues[0]
    }
}

/// Result of a `safe_*` validator. Serializes as `{"success": true, "data": ..}` or
/// `{"success": false, "error": ".."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafeValidation<T> {
    Success(T),
    Failure(String),
}

impl<T> SafeValidation<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SafeValidation::Success(_))
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            SafeValidation::Success(data) => Some(data),
            SafeValidation::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            SafeValidation::Success(_) => None,
            SafeValidation::Failure(message) => Some(message),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for SafeValidation<T> {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(data) => SafeValidation::Success(data),
            Err(err) => SafeValidation::Failure(err.first().to_string()),
        }
    }
}

impl<T: Serialize> Serialize for SafeValidation<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SafeValidation", 2)?;
        match self {
            SafeValidation::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            SafeValidation::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

fn check_hole(checker: &mut Checker, value: &Value, prefix: &str) -> Option<Hole> {
    let obj = checker.object(value, prefix)?;
    let before = checker.issues.len();

    let hole_number = narrow(checker.int(obj, prefix, "holeNumber", HOLE_NUMBER, true));
    let par = narrow(checker.int(obj, prefix, "par", PAR, true));
    let strokes = narrow(checker.int(obj, prefix, "strokes", STROKES, true));
    let fairway_hit = checker.boolean(obj, prefix, "fairwayHit", false);
    let green_in_regulation = checker.boolean(obj, prefix, "greenInRegulation", false);
    let putts = narrow(checker.int(obj, prefix, "putts", PUTTS, false));
    let notes = checker.string(obj, prefix, "notes", NOTES, false);
    let shot_data = checker.string(obj, prefix, "shotData", Length::any(), false);

    if checker.issues.len() != before {
        return None;
    }
    Some(Hole {
        hole_number: hole_number?,
        par: par?,
        strokes: strokes?,
        fairway_hit,
        green_in_regulation,
        putts,
        notes,
        shot_data,
    })
}

fn check_tournament(
    checker: &mut Checker,
    obj: &Map<String, Value>,
) -> (Option<i64>, Option<String>) {
    let id = checker.int(obj, "", "tournamentId", Bounds::new(1, i64::MAX), false);
    let name = checker.string(obj, "", "tournamentName", TOURNAMENT_NAME, false);
    (id, name)
}

fn check_holes(checker: &mut Checker, obj: &Map<String, Value>) -> Option<Vec<Hole>> {
    let items = checker.array(obj, "", "holes", true)?;
    let before = checker.issues.len();
    if items.len() != HOLES_PER_ROUND {
        checker.push(
            "holes",
            format!(
                "a round must contain exactly {HOLES_PER_ROUND} holes, received {}",
                items.len()
            ),
        );
    }

    let holes: Vec<Option<Hole>> = items
        .iter()
        .enumerate()
        .map(|(i, item)| check_hole(checker, item, &format!("holes[{i}]")))
        .collect();

    let mut seen = HashSet::with_capacity(holes.len());
    for (i, hole) in holes.iter().enumerate() {
        if let Some(hole) = hole {
            if !seen.insert(hole.hole_number) {
                checker.push(
                    format!("holes[{i}].holeNumber"),
                    format!("duplicate hole number {}", hole.hole_number),
                );
            }
        }
    }

    if checker.issues.len() != before {
        return None;
    }
    holes.into_iter().collect()
}

fn finish<T>(checker: Checker, record: Option<T>) -> Result<T, ValidationError> {
    if let Some(err) = ValidationError::from_issues(checker.issues) {
        return Err(err);
    }
    record.ok_or_else(|| ValidationError {
        issues: vec![ValidationIssue {
            path: String::new(),
            message: "record could not be read".to_string(),
        }],
    })
}

/// # Errors
///
/// Will return `Err` listing every field that is missing, mistyped or out of range.
pub fn validate_hole(data: &Value) -> Result<Hole, ValidationError> {
    let mut checker = Checker::default();
    let hole = check_hole(&mut checker, data, "");
    finish(checker, hole)
}

/// # Errors
///
/// Will return `Err` listing every invalid field, including a `holes` sequence whose
/// length is not exactly 18.
pub fn validate_round(data: &Value) -> Result<Round, ValidationError> {
    let mut checker = Checker::default();
    let round = check_round(&mut checker, data);
    finish(checker, round)
}

fn check_round(checker: &mut Checker, data: &Value) -> Option<Round> {
    let obj = checker.object(data, "")?;

    let course_name = checker.string(obj, "", "courseName", COURSE_NAME, true);
    let date = checker.date(obj, "", "date", true);
    let holes = check_holes(checker, obj);
    let (tournament_id, tournament_name) = check_tournament(checker, obj);
    let total_score = narrow(checker.int(obj, "", "totalScore", Bounds::at_least(0), false));
    let total_putts = narrow(checker.int(obj, "", "totalPutts", Bounds::at_least(0), false));
    let fairways_hit = narrow(checker.int(obj, "", "fairwaysHit", FAIRWAYS_HIT, false));
    let greens_in_regulation = narrow(checker.int(
        obj,
        "",
        "greensInRegulation",
        GREENS_IN_REGULATION,
        false,
    ));
    let is_finished = checker.boolean(obj, "", "isFinished", false);

    if !checker.is_clean() {
        return None;
    }
    Some(Round {
        course_name: course_name?,
        date: date?,
        holes: holes?,
        tournament_id,
        tournament_name,
        total_score,
        total_putts,
        fairways_hit,
        greens_in_regulation,
        is_finished,
    })
}

/// # Errors
///
/// Will return `Err` listing every invalid field. Holes and aggregates are not read.
pub fn validate_create_round(data: &Value) -> Result<CreateRound, ValidationError> {
    let mut checker = Checker::default();
    let record = checker.object(data, "").and_then(|obj| {
        let course_name = checker.string(obj, "", "courseName", COURSE_NAME, true);
        let date = checker.date(obj, "", "date", true);
        let (tournament_id, tournament_name) = check_tournament(&mut checker, obj);
        Some(CreateRound {
            course_name: course_name?,
            date: date?,
            tournament_id,
            tournament_name,
        })
    });
    finish(checker, record)
}

#[must_use]
pub fn safe_validate_hole(data: &Value) -> SafeValidation<Hole> {
    validate_hole(data).into()
}

#[must_use]
pub fn safe_validate_round(data: &Value) -> SafeValidation<Round> {
    validate_round(data).into()
}

#[must_use]
pub fn safe_validate_create_round(data: &Value) -> SafeValidation<CreateRound> {
    validate_create_round(data).into()
}
