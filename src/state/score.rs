//! Team membership and score bookkeeping.

use crate::state::room::{Match, TeamScheme};

/// One side of a 2-vs-2 pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    /// Team holding the member at turn index 0.
    One,
    /// The opposing team.
    Two,
}

/// Team of the member at `turn` under `scheme`.
pub fn team_of(scheme: TeamScheme, turn: usize) -> Team {
    let team_one = match scheme {
        TeamScheme::A => matches!(turn, 0 | 1),
        TeamScheme::B => matches!(turn, 0 | 2),
        TeamScheme::C => matches!(turn, 0 | 3),
    };
    if team_one { Team::One } else { Team::Two }
}

/// Add `delta` (possibly negative) to the score of `team`, saturating at the `i32` bounds.
pub fn apply_delta(game: &mut Match, team: Team, delta: i32) {
    match team {
        Team::One => game.team_one_score = game.team_one_score.saturating_add(delta),
        Team::Two => game.team_two_score = game.team_two_score.saturating_add(delta),
    }
}
