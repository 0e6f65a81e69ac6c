//! Turn ownership: who explains, who guesses, and who explains next.

use crate::state::{
    room::{GameError, Match, Room, TeamScheme},
    state_machine::MatchState,
};

/// Number of players taking part in a match.
pub const PLAYERS_PER_MATCH: usize = 4;

/// Explainer rotation per scheme, indexed by the current turn. Each step hands the
/// explainer role to the opposing team so all four members explain once every four rounds.
const NEXT_TURN_A: [usize; PLAYERS_PER_MATCH] = [2, 3, 1, 0];
const NEXT_TURN_B: [usize; PLAYERS_PER_MATCH] = [1, 2, 3, 0];
const NEXT_TURN_C: [usize; PLAYERS_PER_MATCH] = [1, 3, 0, 2];

/// Turn index of the explainer of the next round.
pub fn next_turn(scheme: TeamScheme, current_turn: usize) -> usize {
    let table = match scheme {
        TeamScheme::A => &NEXT_TURN_A,
        TeamScheme::B => &NEXT_TURN_B,
        TeamScheme::C => &NEXT_TURN_C,
    };
    table[current_turn % PLAYERS_PER_MATCH]
}

/// Turn index of the guesser: the member diagonally opposite the explainer.
pub fn guesser_index(current_turn: usize) -> usize {
    (current_turn + 2) % PLAYERS_PER_MATCH
}

/// Username of the current explainer.
pub fn explainer(room: &Room) -> Option<&str> {
    room.game().and_then(|game| room.member_at(game.current_turn))
}

/// Authorise `identity` to act as the explainer while the match is in one of `expected`.
///
/// Returns the live match so the caller can mutate it.
pub fn check_turn<'a>(
    room: &'a mut Room,
    identity: &str,
    expected: &'static [MatchState],
) -> Result<&'a mut Match, GameError> {
    if !room.is_member(identity) {
        return Err(GameError::NotMember(identity.to_string()));
    }

    let game = room.game().ok_or(GameError::MatchNotStarted)?;
    if !expected.contains(&game.state) {
        return Err(GameError::InvalidState {
            actual: game.state,
            expected,
        });
    }

    if explainer(room) != Some(identity) {
        return Err(GameError::NotYourTurn(identity.to_string()));
    }

    room.game_mut().ok_or(GameError::MatchNotStarted)
}
