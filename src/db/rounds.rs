use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashSet;

use super::Database;
use crate::error::AppError;
use crate::model::{
    CreateRound, HOLES_PER_ROUND, Hole, Round, RoundId, RoundSummary, RoundTotals, StoredRound,
    TournamentGroup, TournamentRef, group_by_tournament,
};
use crate::notifier::RoundDeletionHub;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_text<T, E>(
    idx: usize,
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    parse(raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn read_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_text(idx, &raw, |s| NaiveDate::parse_from_str(s, DATE_FORMAT))
}

fn read_tournament(row: &Row<'_>, id_idx: usize) -> rusqlite::Result<Option<TournamentRef>> {
    let id: Option<i64> = row.get(id_idx)?;
    let name: Option<String> = row.get(id_idx + 1)?;
    Ok(id.map(|id| TournamentRef { id, name }))
}

fn read_hole(row: &Row<'_>) -> rusqlite::Result<Hole> {
    Ok(Hole {
        hole_number: row.get(0)?,
        par: row.get(1)?,
        strokes: row.get(2)?,
        fairway_hit: row.get(3)?,
        green_in_regulation: row.get(4)?,
        putts: row.get(5)?,
        notes: row.get(6)?,
        shot_data: row.get(7)?,
    })
}

fn load_holes(conn: &Connection, id: RoundId) -> Result<Vec<Hole>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT hole_number, par, strokes, fairway_hit, green_in_regulation, putts, notes, shot_data
         FROM holes
         WHERE round_id = ?1
         ORDER BY hole_number",
    )?;
    let holes = stmt
        .query_map(params![id.0], read_hole)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(holes)
}

fn upsert_hole(conn: &Connection, id: RoundId, hole: &Hole) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO holes
            (round_id, hole_number, par, strokes, fairway_hit, green_in_regulation, putts, notes, shot_data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(round_id, hole_number) DO UPDATE SET
            par = excluded.par,
            strokes = excluded.strokes,
            fairway_hit = excluded.fairway_hit,
            green_in_regulation = excluded.green_in_regulation,
            putts = excluded.putts,
            notes = excluded.notes,
            shot_data = excluded.shot_data",
        params![
            id.0,
            hole.hole_number,
            hole.par,
            hole.strokes,
            hole.fairway_hit,
            hole.green_in_regulation,
            hole.putts,
            hole.notes,
            hole.shot_data,
        ],
    )?;
    Ok(())
}

fn write_totals(conn: &Connection, id: RoundId, totals: &RoundTotals) -> Result<(), AppError> {
    conn.execute(
        "UPDATE rounds
         SET total_score = ?2, total_putts = ?3, fairways_hit = ?4, greens_in_regulation = ?5
         WHERE id = ?1",
        params![
            id.0,
            totals.total_score,
            totals.total_putts,
            totals.fairways_hit,
            totals.greens_in_regulation,
        ],
    )?;
    Ok(())
}

fn duplicate_hole_number(holes: &[Hole]) -> Option<u8> {
    let mut seen = HashSet::with_capacity(holes.len());
    holes
        .iter()
        .map(|h| h.hole_number)
        .find(|number| !seen.insert(*number))
}

fn ensure_exists(conn: &Connection, id: RoundId) -> Result<(), AppError> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM rounds WHERE id = ?1", params![id.0], |row| {
            row.get(0)
        })
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("round {id}")))
}

/// Round persistence. Deletions are announced on the hub once they are committed.
#[derive(Clone, Debug)]
pub struct RoundRepository {
    db: Database,
    hub: RoundDeletionHub,
}

impl RoundRepository {
    #[must_use]
    pub fn new(db: Database, hub: RoundDeletionHub) -> Self {
        Self { db, hub }
    }

    #[must_use]
    pub fn hub(&self) -> &RoundDeletionHub {
        &self.hub
    }

    /// Starts a round with no holes recorded.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the insert fails.
    pub async fn create_round(&self, round: &CreateRound) -> Result<RoundId, AppError> {
        let round = round.clone();
        self.db
            .interact(move |conn| {
                conn.execute(
                    "INSERT INTO rounds (course_name, round_date, tournament_id, tournament_name)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        round.course_name,
                        round.date.format(DATE_FORMAT).to_string(),
                        round.tournament_id,
                        round.tournament_name,
                    ],
                )?;
                let id = RoundId(conn.last_insert_rowid());
                tracing::debug!(%id, course = %round.course_name, "created round");
                Ok(id)
            })
            .await
    }

    /// Replaces everything stored for `id` with `round`. Aggregates the round leaves
    /// empty are computed from its holes.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the round does not exist, lists a hole number twice, or the
    /// write fails.
    pub async fn save_round(&self, id: RoundId, round: &Round) -> Result<(), AppError> {
        if let Some(hole_number) = duplicate_hole_number(&round.holes) {
            return Err(AppError::DuplicateHole {
                round: id,
                hole_number,
            });
        }
        let mut round = round.clone();
        RoundTotals::from_holes(&round.holes).fill_missing(&mut round);

        self.db
            .interact(move |conn| {
                let tx = conn.transaction()?;
                let updated = tx.execute(
                    "UPDATE rounds
                     SET course_name = ?2, round_date = ?3, tournament_id = ?4,
                         tournament_name = ?5, total_score = ?6, total_putts = ?7,
                         fairways_hit = ?8, greens_in_regulation = ?9, is_finished = ?10
                     WHERE id = ?1",
                    params![
                        id.0,
                        round.course_name,
                        round.date.format(DATE_FORMAT).to_string(),
                        round.tournament_id,
                        round.tournament_name,
                        round.total_score,
                        round.total_putts,
                        round.fairways_hit,
                        round.greens_in_regulation,
                        round.is_finished.unwrap_or(false),
                    ],
                )?;
                if updated == 0 {
                    return Err(AppError::NotFound(format!("round {id}")));
                }

                tx.execute("DELETE FROM holes WHERE round_id = ?1", params![id.0])?;
                for hole in &round.holes {
                    upsert_hole(&tx, id, hole)?;
                }
                tx.commit()?;
                tracing::debug!(%id, holes = round.holes.len(), "saved round");
                Ok(())
            })
            .await
    }

    /// Records one hole of a round in progress and refreshes the round's totals.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the round does not exist or the write fails.
    pub async fn update_hole(&self, id: RoundId, hole: &Hole) -> Result<RoundTotals, AppError> {
        let hole = hole.clone();
        self.db
            .interact(move |conn| {
                let tx = conn.transaction()?;
                ensure_exists(&tx, id)?;
                upsert_hole(&tx, id, &hole)?;
                let totals = RoundTotals::from_holes(&load_holes(&tx, id)?);
                write_totals(&tx, id, &totals)?;
                tx.commit()?;
                Ok(totals)
            })
            .await
    }

    /// Marks a round finished once all of its holes are recorded.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the round does not exist or is missing holes.
    pub async fn finish_round(&self, id: RoundId) -> Result<RoundTotals, AppError> {
        self.db
            .interact(move |conn| {
                let tx = conn.transaction()?;
                ensure_exists(&tx, id)?;
                let holes = load_holes(&tx, id)?;
                if holes.len() != HOLES_PER_ROUND {
                    return Err(AppError::Incomplete {
                        round: id,
                        recorded: holes.len(),
                    });
                }
                let totals = RoundTotals::from_holes(&holes);
                write_totals(&tx, id, &totals)?;
                tx.execute("UPDATE rounds SET is_finished = 1 WHERE id = ?1", params![id.0])?;
                tx.commit()?;
                tracing::debug!(%id, total = totals.total_score, "finished round");
                Ok(totals)
            })
            .await
    }

    /// Holes come back ordered by hole number; an unfinished round may have fewer than 18.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub async fn get_round(&self, id: RoundId) -> Result<Option<StoredRound>, AppError> {
        self.db
            .interact(move |conn| {
                let header = conn
                    .query_row(
                        "SELECT course_name, round_date, tournament_id, tournament_name,
                                total_score, total_putts, fairways_hit, greens_in_regulation,
                                is_finished, created_at
                         FROM rounds
                         WHERE id = ?1",
                        params![id.0],
                        |row| {
                            let created_raw: String = row.get(9)?;
                            let created_at = parse_text(9, &created_raw, |s| {
                                NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                            })?;
                            let round = Round {
                                course_name: row.get(0)?,
                                date: read_date(row, 1)?,
                                holes: Vec::new(),
                                tournament_id: row.get(2)?,
                                tournament_name: row.get(3)?,
                                total_score: row.get(4)?,
                                total_putts: row.get(5)?,
                                fairways_hit: row.get(6)?,
                                greens_in_regulation: row.get(7)?,
                                is_finished: Some(row.get(8)?),
                            };
                            Ok((round, created_at))
                        },
                    )
                    .optional()?;

                let Some((mut round, created_at)) = header else {
                    return Ok(None);
                };
                round.holes = load_holes(conn, id)?;
                Ok(Some(StoredRound {
                    id,
                    round,
                    created_at,
                }))
            })
            .await
    }

    /// Newest rounds first.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub async fn list_rounds(&self) -> Result<Vec<RoundSummary>, AppError> {
        self.db
            .interact(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT r.id, r.course_name, r.round_date, r.tournament_id,
                            r.tournament_name, r.total_score, r.is_finished,
                            (SELECT COUNT(*) FROM holes h WHERE h.round_id = r.id)
                     FROM rounds r
                     ORDER BY r.round_date DESC, r.id DESC",
                )?;
                let rounds = stmt
                    .query_map([], |row| {
                        let holes_recorded: i64 = row.get(7)?;
                        Ok(RoundSummary {
                            id: RoundId(row.get(0)?),
                            course_name: row.get(1)?,
                            date: read_date(row, 2)?,
                            tournament: read_tournament(row, 3)?,
                            total_score: row.get(5)?,
                            is_finished: row.get(6)?,
                            holes_recorded: usize::try_from(holes_recorded).unwrap_or_default(),
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rounds)
            })
            .await
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub async fn list_tournaments(&self) -> Result<Vec<TournamentGroup>, AppError> {
        Ok(group_by_tournament(self.list_rounds().await?))
    }

    /// Deletes a round and its holes. Returns `false` when there was nothing to delete;
    /// listeners are only told about deletions that happened.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the delete fails. Listeners are not called in that case.
    pub async fn delete_round(&self, id: RoundId) -> Result<bool, AppError> {
        let deleted = self
            .db
            .interact(move |conn| {
                let tx = conn.transaction()?;
                let deleted = tx.execute("DELETE FROM rounds WHERE id = ?1", params![id.0])?;
                tx.commit()?;
                Ok(deleted > 0)
            })
            .await?;

        if deleted {
            self.hub.notify_round_deleted(id);
        } else {
            tracing::debug!(%id, "delete requested for unknown round");
        }
        Ok(deleted)
    }
}
