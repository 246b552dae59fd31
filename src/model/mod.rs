pub mod scoring;
pub mod tournament;
pub mod types;

pub use scoring::{RoundTotals, format_score_to_par, score_to_par};
pub use tournament::{TournamentGroup, group_by_tournament};
pub use types::{
    CreateRound, HOLES_PER_ROUND, Hole, Round, RoundId, RoundSummary, StoredRound, TournamentRef,
};
