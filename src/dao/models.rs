use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::{
    room::{MatchSettings, TeamScheme},
    state_machine::MatchState,
    words::{Complexity, WordId},
};

/// Room as stored by the persistence layer, match and word log included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomEntity {
    /// Stable identifier for the room.
    pub id: Uuid,
    /// Display name of the room.
    pub name: String,
    /// Member usernames, in no particular order.
    pub members: Vec<String>,
    /// Team pairing in effect.
    pub scheme: TeamScheme,
    /// Match owned by the room, if one was started.
    pub game: Option<MatchEntity>,
}

/// Match stored alongside its room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Lifecycle state.
    pub state: MatchState,
    /// Index of the explainer in the sorted member list.
    pub current_turn: usize,
    /// 1-based round number.
    pub current_round: u32,
    /// Start of the current (or last) round.
    pub round_start_time: Option<SystemTime>,
    /// Settings captured at match creation.
    pub settings: MatchSettings,
    /// Score of the first team of the scheme.
    pub team_one_score: i32,
    /// Score of the second team of the scheme.
    pub team_two_score: i32,
    /// Served words, oldest first.
    pub words: Vec<SelectedWordEntity>,
    /// Round counter used to spot stale timers.
    pub round_token: u64,
}

/// Entry of the per-match word log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedWordEntity {
    /// Catalog identifier of the word.
    pub word_id: WordId,
    /// Text served to the explainer.
    pub text: String,
}

/// Word of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordEntity {
    /// Identifier assigned by the store.
    pub id: WordId,
    /// Word to guess.
    pub text: String,
    /// Difficulty tier.
    pub complexity: Complexity,
}

/// Word about to be added to the catalog; the store assigns its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewWordEntity {
    /// Word to guess.
    pub text: String,
    /// Difficulty tier.
    pub complexity: Complexity,
}
