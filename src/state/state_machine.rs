use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle states of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    /// Match created, first round not started yet.
    Newborn,
    /// A round is running and the explainer is describing words.
    Playing,
    /// The previous round elapsed; waiting for the next explainer to play.
    Waiting,
    /// Every round has been played.
    Finished,
}

/// Events that can be applied to a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// The explainer starts a round.
    Play,
    /// The guesser found the current word.
    Correct,
    /// The explainer skipped the current word.
    Skip,
    /// The round timer fired.
    RoundElapsed {
        /// Whether the elapsed round was the final one.
        last_round: bool,
    },
}

impl MatchEvent {
    /// States from which this event is accepted.
    pub fn accepted_from(self) -> &'static [MatchState] {
        match self {
            MatchEvent::Play => &[MatchState::Newborn, MatchState::Waiting],
            MatchEvent::Correct | MatchEvent::Skip | MatchEvent::RoundElapsed { .. } => {
                &[MatchState::Playing]
            }
        }
    }
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The state the match was in when the invalid event was received.
    pub from: MatchState,
    /// The event that cannot be applied from this state.
    pub event: MatchEvent,
}

/// Compute the state reached by applying `event` from `from`.
pub fn next_state(from: MatchState, event: MatchEvent) -> Result<MatchState, InvalidTransition> {
    let next = match (from, event) {
        (MatchState::Newborn | MatchState::Waiting, MatchEvent::Play) => MatchState::Playing,
        (MatchState::Playing, MatchEvent::Correct | MatchEvent::Skip) => MatchState::Playing,
        (MatchState::Playing, MatchEvent::RoundElapsed { last_round: false }) => {
            MatchState::Waiting
        }
        (MatchState::Playing, MatchEvent::RoundElapsed { last_round: true }) => {
            MatchState::Finished
        }
        (from, event) => return Err(InvalidTransition { from, event }),
    };

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [MatchState; 4] = [
        MatchState::Newborn,
        MatchState::Playing,
        MatchState::Waiting,
        MatchState::Finished,
    ];

    const ALL_EVENTS: [MatchEvent; 5] = [
        MatchEvent::Play,
        MatchEvent::Correct,
        MatchEvent::Skip,
        MatchEvent::RoundElapsed { last_round: false },
        MatchEvent::RoundElapsed { last_round: true },
    ];

    #[test]
    fn full_happy_path_through_match() {
        let mut state = MatchState::Newborn;
        state = next_state(state, MatchEvent::Play).unwrap();
        assert_eq!(state, MatchState::Playing);
        state = next_state(state, MatchEvent::Correct).unwrap();
        state = next_state(state, MatchEvent::Skip).unwrap();
        assert_eq!(state, MatchState::Playing);
        state = next_state(state, MatchEvent::RoundElapsed { last_round: false }).unwrap();
        assert_eq!(state, MatchState::Waiting);
        state = next_state(state, MatchEvent::Play).unwrap();
        state = next_state(state, MatchEvent::RoundElapsed { last_round: true }).unwrap();
        assert_eq!(state, MatchState::Finished);
    }

    #[test]
    fn finished_accepts_nothing() {
        for event in ALL_EVENTS {
            let err = next_state(MatchState::Finished, event).unwrap_err();
            assert_eq!(err.from, MatchState::Finished);
            assert_eq!(err.event, event);
        }
    }

    #[test]
    fn guesses_require_running_round() {
        assert!(next_state(MatchState::Newborn, MatchEvent::Correct).is_err());
        assert!(next_state(MatchState::Waiting, MatchEvent::Skip).is_err());
        assert!(next_state(MatchState::Playing, MatchEvent::Play).is_err());
    }

    #[test]
    fn accepted_from_matches_transition_table() {
        for event in ALL_EVENTS {
            for state in ALL_STATES {
                assert_eq!(
                    event.accepted_from().contains(&state),
                    next_state(state, event).is_ok(),
                    "{event:?} from {state:?}"
                );
            }
        }
    }
}
