use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{format_system_time, validation::validate_username},
    state::{
        room::{Match, Room, RoomId, TeamScheme},
        state_machine::MatchState,
    },
};

/// Payload used to open a new room.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 128))]
    /// Display name, 1 to 128 characters once trimmed.
    pub name: String,
    /// Usernames added to the room at creation time.
    #[serde(default)]
    #[validate(custom(function = "validate_players"))]
    pub players: Vec<String>,
}

fn validate_players(players: &[String]) -> Result<(), validator::ValidationError> {
    players
        .iter()
        .try_for_each(|player| validate_username(player))
}

/// Payload used to change the team pairing of a room.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RearrangeRequest {
    /// One of `A`, `B` or `C`.
    pub scheme: String,
}

/// Word served to the explainer after `play`, `correct` or `skip`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WordResponse {
    /// Text of the word.
    pub word: String,
}

/// Entry of the served-words log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WordSnapshot {
    /// Text of the word, or the placeholder for the guesser.
    pub text: String,
}

/// Public view of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MatchSnapshot {
    /// Lifecycle state.
    pub state: MatchState,
    /// Index of the explainer in `members`.
    pub current_turn: usize,
    /// 1-based round number.
    pub current_round: u32,
    /// RFC 3339 start of the current round, null before the first round.
    pub round_start_time: Option<String>,
    /// Rounds before the match finishes.
    pub total_round_count: u32,
    /// Length of a round.
    pub round_duration_seconds: u64,
    /// Score of the first team of the scheme.
    pub team_one_score: i32,
    /// Score of the second team of the scheme.
    pub team_two_score: i32,
    /// Points credited on a correct guess.
    pub correct_guess_score: i32,
    /// Points debited on a skip.
    pub skip_penalty: i32,
    /// Served words, oldest first. The last entry is the current word.
    pub words: Vec<WordSnapshot>,
}

impl From<&Match> for MatchSnapshot {
    fn from(game: &Match) -> Self {
        Self {
            state: game.state,
            current_turn: game.current_turn,
            current_round: game.current_round,
            round_start_time: game.round_start_time.map(format_system_time),
            total_round_count: game.settings.total_round_count,
            round_duration_seconds: game.settings.round_duration_seconds,
            team_one_score: game.team_one_score,
            team_two_score: game.team_two_score,
            correct_guess_score: game.settings.correct_guess_score,
            skip_penalty: game.settings.skip_penalty,
            words: game
                .words
                .iter()
                .map(|word| WordSnapshot {
                    text: word.text.clone(),
                })
                .collect(),
        }
    }
}

/// State of a room as published to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RoomSnapshot {
    /// Identifier of the room.
    #[schema(value_type = String, format = Uuid)]
    pub room_id: RoomId,
    /// Display name.
    pub name: String,
    /// Members in turn order.
    pub members: Vec<String>,
    /// Team pairing in effect.
    pub scheme: TeamScheme,
    /// Match of the room, serialized as `match`.
    #[serde(rename = "match")]
    pub game: Option<MatchSnapshot>,
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id(),
            name: room.name().to_string(),
            members: room.members().iter().cloned().collect(),
            scheme: room.scheme(),
            game: room.game().map(MatchSnapshot::from),
        }
    }
}

/// Response of the ticket endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketResponse {
    /// Opaque ticket to pass as the `ticket` query parameter of the room socket.
    pub ticket: String,
    /// Expiry (unix seconds).
    pub expires_at: i64,
}

/// Query string of the room socket.
#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    /// Ticket issued by the ticket endpoint.
    pub ticket: Option<String>,
}
