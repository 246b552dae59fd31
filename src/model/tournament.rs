use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{RoundSummary, TournamentRef};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentGroup {
    /// `None` collects rounds that were not played as part of a tournament.
    pub tournament: Option<TournamentRef>,
    pub rounds: Vec<RoundSummary>,
}

/// Groups rounds by tournament id. Groups come back ordered by tournament id with the
/// unassigned rounds last; each group is ordered by date, then id.
#[must_use]
pub fn group_by_tournament(rounds: Vec<RoundSummary>) -> Vec<TournamentGroup> {
    let mut grouped: HashMap<Option<i64>, TournamentGroup, RandomState> = HashMap::default();

    for round in rounds {
        let key = round.tournament.as_ref().map(|t| t.id);
        let group = grouped.entry(key).or_insert_with(|| TournamentGroup {
            tournament: round.tournament.clone(),
            rounds: Vec::new(),
        });
        // first round carrying a name wins, in case older rounds were saved without one
        if let (Some(existing), Some(incoming)) = (group.tournament.as_mut(), &round.tournament) {
            if existing.name.is_none() {
                existing.name.clone_from(&incoming.name);
            }
        }
        group.rounds.push(round);
    }

    let mut sorted: Vec<(Option<i64>, TournamentGroup)> = grouped.into_iter().collect();
    sorted.sort_by_key(|(id, _)| (id.is_none(), *id));

    sorted
        .into_iter()
        .map(|(_, mut group)| {
            group.rounds.sort_by_key(|r| (r.date, r.id));
            group
        })
        .collect()
}
