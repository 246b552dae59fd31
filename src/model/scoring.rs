use serde::{Deserialize, Serialize};

use super::types::{HOLES_PER_ROUND, Hole, Round};

/// Fairways are only tracked on par 4s and par 5s, of which a course has at most 14.
pub const MAX_FAIRWAYS: u8 = 14;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoundTotals {
    pub total_score: u32,
    pub total_putts: u32,
    pub fairways_hit: u8,
    pub greens_in_regulation: u8,
}

impl RoundTotals {
    #[must_use]
    pub fn from_holes(holes: &[Hole]) -> Self {
        let mut totals = RoundTotals::default();
        let mut fairways: usize = 0;
        let mut greens: usize = 0;
        for hole in holes {
            // putts are counted wherever they were entered, strokes only once played
            totals.total_putts += u32::from(hole.putts.unwrap_or(0));
            if !hole.is_played() {
                continue;
            }
            totals.total_score += u32::from(hole.strokes);
            if hole.par > 3 && hole.fairway_hit == Some(true) {
                fairways += 1;
            }
            if hole.green_in_regulation == Some(true) {
                greens += 1;
            }
        }
        totals.fairways_hit = u8::try_from(fairways.min(usize::from(MAX_FAIRWAYS)))
            .unwrap_or(MAX_FAIRWAYS);
        totals.greens_in_regulation = u8::try_from(greens.min(HOLES_PER_ROUND))
            .unwrap_or(u8::MAX);
        totals
    }

    /// Copies the totals onto the round, keeping any aggregate the caller already set.
    pub fn fill_missing(&self, round: &mut Round) {
        round.total_score.get_or_insert(self.total_score);
        round.total_putts.get_or_insert(self.total_putts);
        round.fairways_hit.get_or_insert(self.fairways_hit);
        round
            .greens_in_regulation
            .get_or_insert(self.greens_in_regulation);
    }
}

/// Strokes relative to par over the holes played so far.
#[must_use]
pub fn score_to_par(holes: &[Hole]) -> i32 {
    holes
        .iter()
        .filter(|h| h.is_played())
        .map(|h| i32::from(h.strokes) - i32::from(h.par))
        .sum()
}

#[must_use]
pub fn format_score_to_par(relative: i32) -> String {
    match relative {
        0 => "E".to_string(),
        n if n > 0 => format!("+{n}"),
        n => n.to_string(),
    }
}
