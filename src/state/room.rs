//! Rooms, their single match, and the domain errors raised while mutating them.

use std::{
    collections::BTreeSet,
    ops::RangeInclusive,
    str::FromStr,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{MatchEntity, RoomEntity, SelectedWordEntity};
use crate::state::{
    score,
    state_machine::{InvalidTransition, MatchEvent, MatchState, next_state},
    turns::{self, PLAYERS_PER_MATCH},
    words::{Complexity, Word, WordId},
};

/// Identifier of a room.
pub type RoomId = Uuid;

/// Maximum number of members a room accepts.
pub const ROOM_CAPACITY: usize = PLAYERS_PER_MATCH;

/// Failures raised by room and match operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The identity does not belong to the room.
    #[error("`{0}` is not a member of this room")]
    NotMember(String),
    /// The identity is a member but not the current explainer.
    #[error("it is not `{0}`'s turn to explain")]
    NotYourTurn(String),
    /// The match is not in a state accepting the operation.
    #[error("match is {actual:?}, operation requires one of {expected:?}")]
    InvalidState {
        /// State the match is in.
        actual: MatchState,
        /// States that would have accepted the operation.
        expected: &'static [MatchState],
    },
    /// The room already owns a match.
    #[error("a match has already been started in this room")]
    AlreadyStarted,
    /// The room needs exactly four members for this operation.
    #[error("room needs exactly 4 players, it has {0}")]
    NotEnoughPlayers(usize),
    /// The room has no match yet.
    #[error("no match has been started in this room")]
    MatchNotStarted,
    /// The room is full.
    #[error("maximum room capacity exceeded")]
    CapacityExceeded,
    /// The requested team pairing is not one of the known schemes.
    #[error("unknown team scheme `{0}`")]
    InvalidScheme(String),
    /// The drawn complexity tier has no words.
    #[error("no {0:?} words available")]
    WordsUnavailable(Complexity),
    /// No room exists with this identifier.
    #[error("room `{0}` not found")]
    RoomNotFound(RoomId),
    /// A persisted match breaks the match invariants.
    #[error("persisted match is inconsistent: {0}")]
    CorruptedMatch(&'static str),
}

impl From<InvalidTransition> for GameError {
    fn from(err: InvalidTransition) -> Self {
        GameError::InvalidState {
            actual: err.from,
            expected: err.event.accepted_from(),
        }
    }
}

/// 2-vs-2 pairing of the sorted members `p0..p3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TeamScheme {
    /// `(p0, p1)` vs `(p2, p3)`.
    #[default]
    A,
    /// `(p0, p2)` vs `(p1, p3)`.
    B,
    /// `(p0, p3)` vs `(p1, p2)`.
    C,
}

impl FromStr for TeamScheme {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "A" | "a" => Ok(TeamScheme::A),
            "B" | "b" => Ok(TeamScheme::B),
            "C" | "c" => Ok(TeamScheme::C),
            other => Err(GameError::InvalidScheme(other.to_string())),
        }
    }
}

/// Accepted values of [`MatchSettings::total_round_count`].
pub const ROUND_COUNT_RANGE: RangeInclusive<u32> = 1..=1_000;
/// Accepted values of [`MatchSettings::round_duration_seconds`], up to one day.
pub const ROUND_DURATION_RANGE: RangeInclusive<u64> = 1..=86_400;
/// Accepted values of [`MatchSettings::correct_guess_score`] and [`MatchSettings::skip_penalty`].
pub const SCORE_STEP_RANGE: RangeInclusive<i32> = 0..=1_000;

/// Tunables copied into every new match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Number of rounds before the match finishes.
    pub total_round_count: u32,
    /// Length of a round in seconds.
    pub round_duration_seconds: u64,
    /// Points credited to the explainer's team on a correct guess.
    pub correct_guess_score: i32,
    /// Points debited from the explainer's team on a skip.
    pub skip_penalty: i32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            total_round_count: 8,
            round_duration_seconds: 100,
            correct_guess_score: 3,
            skip_penalty: 1,
        }
    }
}

impl MatchSettings {
    /// Round length as a [`Duration`].
    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(self.round_duration_seconds)
    }

    /// Check every tunable against its accepted range.
    pub fn check(&self) -> Result<(), &'static str> {
        if !ROUND_COUNT_RANGE.contains(&self.total_round_count) {
            return Err("total_round_count out of range");
        }
        if !ROUND_DURATION_RANGE.contains(&self.round_duration_seconds) {
            return Err("round_duration_seconds out of range");
        }
        if !SCORE_STEP_RANGE.contains(&self.correct_guess_score) {
            return Err("correct_guess_score out of range");
        }
        if !SCORE_STEP_RANGE.contains(&self.skip_penalty) {
            return Err("skip_penalty out of range");
        }
        Ok(())
    }
}

/// Entry of the append-only word log of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedWord {
    /// Catalog identifier of the word.
    pub word_id: WordId,
    /// Text served to the explainer.
    pub text: String,
}

impl From<Word> for SelectedWord {
    fn from(word: Word) -> Self {
        Self {
            word_id: word.id,
            text: word.text,
        }
    }
}

/// Identifies the round a timer was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundKey {
    /// 1-based round number.
    pub round: u32,
    /// Explainer turn index.
    pub turn: usize,
    /// Counter bumped every time a round starts.
    pub token: u64,
}

/// Result of a round timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundElapsed {
    /// The room or its match no longer exists.
    NoMatch,
    /// The timer belonged to a round that is no longer active.
    Stale,
    /// The turn rotated and the match waits for the next explainer.
    Advanced,
    /// The final round elapsed.
    Finished,
}

/// Whether the explainer's team earned or lost points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The word was guessed.
    Correct,
    /// The word was skipped.
    Skip,
}

impl GuessOutcome {
    /// State machine event carrying this outcome.
    pub fn event(self) -> MatchEvent {
        match self {
            GuessOutcome::Correct => MatchEvent::Correct,
            GuessOutcome::Skip => MatchEvent::Skip,
        }
    }
}

/// Mutable state of one playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Current lifecycle state.
    pub state: MatchState,
    /// Index of the explainer in the sorted member list.
    pub current_turn: usize,
    /// 1-based round number.
    pub current_round: u32,
    /// When the current (or last) round started.
    pub round_start_time: Option<SystemTime>,
    /// Settings captured when the match was created.
    pub settings: MatchSettings,
    /// Score of the first team of the scheme.
    pub team_one_score: i32,
    /// Score of the second team of the scheme.
    pub team_two_score: i32,
    /// Every word served so far, oldest first.
    pub words: Vec<SelectedWord>,
    /// Bumped on every round start; used to detect stale timers.
    pub round_token: u64,
}

impl Match {
    /// Fresh match waiting for its first round.
    pub fn new(settings: MatchSettings) -> Self {
        Self {
            state: MatchState::Newborn,
            current_turn: 0,
            current_round: 1,
            round_start_time: None,
            settings,
            team_one_score: 0,
            team_two_score: 0,
            words: Vec::new(),
            round_token: 0,
        }
    }

    /// Key identifying the current round.
    pub fn round_key(&self) -> RoundKey {
        RoundKey {
            round: self.current_round,
            turn: self.current_turn,
            token: self.round_token,
        }
    }

    /// Word currently shown to the explainer, if any.
    pub fn current_word(&self) -> Option<&SelectedWord> {
        self.words.last()
    }

    /// Start a round with the first word, returning the key the timer must be armed with.
    pub fn begin_round(
        &mut self,
        word: SelectedWord,
        now: SystemTime,
    ) -> Result<RoundKey, GameError> {
        self.state = next_state(self.state, MatchEvent::Play)?;
        self.words.push(word);
        self.round_start_time = Some(now);
        self.round_token += 1;
        Ok(self.round_key())
    }

    /// Serve the next word after a guess or skip and adjust the explainer's team score.
    ///
    /// Returns the applied score delta.
    pub fn record_guess(
        &mut self,
        scheme: TeamScheme,
        outcome: GuessOutcome,
        word: SelectedWord,
    ) -> Result<i32, GameError> {
        self.state = next_state(self.state, outcome.event())?;
        self.words.push(word);

        let delta = match outcome {
            GuessOutcome::Correct => self.settings.correct_guess_score,
            GuessOutcome::Skip => self.settings.skip_penalty.saturating_neg(),
        };
        let team = score::team_of(scheme, self.current_turn);
        score::apply_delta(self, team, delta);
        Ok(delta)
    }

    /// Apply a round timer armed for `key`.
    ///
    /// Timers whose round is no longer the running one leave the match untouched.
    pub fn elapse_round(&mut self, key: &RoundKey, scheme: TeamScheme) -> RoundElapsed {
        if self.state != MatchState::Playing || self.round_key() != *key {
            return RoundElapsed::Stale;
        }

        let last_round = self.current_round >= self.settings.total_round_count;
        let Ok(next) = next_state(self.state, MatchEvent::RoundElapsed { last_round }) else {
            return RoundElapsed::Stale;
        };
        self.state = next;

        if last_round {
            RoundElapsed::Finished
        } else {
            self.current_turn = turns::next_turn(scheme, self.current_turn);
            self.current_round += 1;
            RoundElapsed::Advanced
        }
    }

    /// Check the invariants a match read back from storage must hold.
    fn check_restored(&self) -> Result<(), GameError> {
        self.settings.check().map_err(GameError::CorruptedMatch)?;
        if self.current_turn >= PLAYERS_PER_MATCH {
            return Err(GameError::CorruptedMatch("current_turn out of range"));
        }
        if self.current_round == 0 || self.current_round > self.settings.total_round_count {
            return Err(GameError::CorruptedMatch("current_round out of range"));
        }

        let has_round = !self.words.is_empty() && self.round_start_time.is_some();
        match self.state {
            MatchState::Newborn if !self.words.is_empty() => {
                Err(GameError::CorruptedMatch("words served before the first round"))
            }
            MatchState::Playing | MatchState::Waiting | MatchState::Finished if !has_round => {
                Err(GameError::CorruptedMatch("round without word or start time"))
            }
            _ => Ok(()),
        }
    }
}

/// Outcome of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The identity was added.
    Joined,
    /// The identity was already a member; nothing changed.
    AlreadyMember,
}

/// Lobby of up to four players sharing at most one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    name: String,
    members: BTreeSet<String>,
    scheme: TeamScheme,
    game: Option<Match>,
}

impl Room {
    /// Empty room with a fresh identifier.
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            members: BTreeSet::new(),
            scheme: TeamScheme::default(),
            game: None,
        }
    }

    /// Rebuild a room from persisted parts, enforcing the room and match invariants.
    pub fn from_parts(
        id: RoomId,
        name: String,
        members: BTreeSet<String>,
        scheme: TeamScheme,
        game: Option<Match>,
    ) -> Result<Self, GameError> {
        if members.len() > ROOM_CAPACITY {
            return Err(GameError::CapacityExceeded);
        }
        if let Some(game) = &game {
            if members.len() != ROOM_CAPACITY {
                return Err(GameError::NotEnoughPlayers(members.len()));
            }
            game.check_restored()?;
        }
        Ok(Self {
            id,
            name,
            members,
            scheme,
            game,
        })
    }

    /// Identifier of the room.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in canonical turn order (lexicographic username order).
    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    /// Team pairing in effect.
    pub fn scheme(&self) -> TeamScheme {
        self.scheme
    }

    /// The room's match, once started.
    pub fn game(&self) -> Option<&Match> {
        self.game.as_ref()
    }

    pub(crate) fn game_mut(&mut self) -> Option<&mut Match> {
        self.game.as_mut()
    }

    /// Whether `identity` belongs to the room.
    pub fn is_member(&self, identity: &str) -> bool {
        self.members.contains(identity)
    }

    /// Member at `index` in turn order.
    pub fn member_at(&self, index: usize) -> Option<&str> {
        self.members.iter().nth(index).map(String::as_str)
    }

    /// Add `identity` to the room. Joining twice is a no-op.
    pub fn join(&mut self, identity: &str) -> Result<JoinOutcome, GameError> {
        if self.is_member(identity) {
            return Ok(JoinOutcome::AlreadyMember);
        }
        if self.members.len() >= ROOM_CAPACITY {
            return Err(GameError::CapacityExceeded);
        }
        self.members.insert(identity.to_string());
        Ok(JoinOutcome::Joined)
    }

    /// Change the team pairing; only allowed on a full room before the match exists.
    ///
    /// `scheme` is parsed once the room checks passed, so their errors come first.
    pub fn rearrange(&mut self, identity: &str, scheme: &str) -> Result<TeamScheme, GameError> {
        self.ensure_can_start(identity)?;
        self.scheme = scheme.parse()?;
        Ok(self.scheme)
    }

    /// Create the room's match.
    pub fn start_match(
        &mut self,
        identity: &str,
        settings: MatchSettings,
    ) -> Result<&Match, GameError> {
        self.ensure_can_start(identity)?;
        Ok(self.game.insert(Match::new(settings)))
    }

    fn ensure_can_start(&self, identity: &str) -> Result<(), GameError> {
        if !self.is_member(identity) {
            return Err(GameError::NotMember(identity.to_string()));
        }
        if self.members.len() != ROOM_CAPACITY {
            return Err(GameError::NotEnoughPlayers(self.members.len()));
        }
        if self.game.is_some() {
            return Err(GameError::AlreadyStarted);
        }
        Ok(())
    }
}

impl From<SelectedWordEntity> for SelectedWord {
    fn from(value: SelectedWordEntity) -> Self {
        Self {
            word_id: value.word_id,
            text: value.text,
        }
    }
}

impl From<&SelectedWord> for SelectedWordEntity {
    fn from(value: &SelectedWord) -> Self {
        Self {
            word_id: value.word_id,
            text: value.text.clone(),
        }
    }
}

impl From<MatchEntity> for Match {
    fn from(value: MatchEntity) -> Self {
        Self {
            state: value.state,
            current_turn: value.current_turn,
            current_round: value.current_round,
            round_start_time: value.round_start_time,
            settings: value.settings,
            team_one_score: value.team_one_score,
            team_two_score: value.team_two_score,
            words: value.words.into_iter().map(Into::into).collect(),
            round_token: value.round_token,
        }
    }
}

impl From<&Match> for MatchEntity {
    fn from(value: &Match) -> Self {
        Self {
            state: value.state,
            current_turn: value.current_turn,
            current_round: value.current_round,
            round_start_time: value.round_start_time,
            settings: value.settings,
            team_one_score: value.team_one_score,
            team_two_score: value.team_two_score,
            words: value.words.iter().map(Into::into).collect(),
            round_token: value.round_token,
        }
    }
}

impl TryFrom<RoomEntity> for Room {
    type Error = GameError;

    fn try_from(value: RoomEntity) -> Result<Self, Self::Error> {
        Room::from_parts(
            value.id,
            value.name,
            value.members.into_iter().collect(),
            value.scheme,
            value.game.map(Into::into),
        )
    }
}

impl From<&Room> for RoomEntity {
    fn from(value: &Room) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            members: value.members.iter().cloned().collect(),
            scheme: value.scheme,
            game: value.game.as_ref().map(Into::into),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn full_room() -> Room {
        let mut room = Room::new("Room1".into());
        for name in ["dave", "alice", "carol", "bob"] {
            room.join(name).unwrap();
        }
        room
    }

    fn word(id: WordId, text: &str) -> SelectedWord {
        SelectedWord {
            word_id: id,
            text: text.into(),
        }
    }

    #[test]
    fn members_are_kept_in_turn_order() {
        let room = full_room();
        let order: Vec<_> = (0..4).filter_map(|i| room.member_at(i)).collect();
        assert_eq!(order, ["alice", "bob", "carol", "dave"]);
    }

    #[test]
    fn join_is_idempotent() {
        let mut room = Room::new("Room1".into());
        assert_eq!(room.join("alice").unwrap(), JoinOutcome::Joined);
        for _ in 0..3 {
            assert_eq!(room.join("alice").unwrap(), JoinOutcome::AlreadyMember);
        }
        assert_eq!(room.members().len(), 1);
    }

    #[test]
    fn fifth_member_is_rejected() {
        let mut room = full_room();
        assert_eq!(room.join("erin"), Err(GameError::CapacityExceeded));
        assert_eq!(room.join("alice"), Ok(JoinOutcome::AlreadyMember));
        assert_eq!(room.members().len(), ROOM_CAPACITY);
    }

    #[test]
    fn start_match_requires_full_room_and_membership() {
        let mut room = Room::new("Room1".into());
        room.join("alice").unwrap();
        assert_eq!(
            room.start_match("alice", MatchSettings::default()).unwrap_err(),
            GameError::NotEnoughPlayers(1)
        );

        let mut room = full_room();
        assert_eq!(
            room.start_match("mallory", MatchSettings::default()).unwrap_err(),
            GameError::NotMember("mallory".into())
        );

        let created = room.start_match("bob", MatchSettings::default()).unwrap();
        assert_eq!(created.state, MatchState::Newborn);
        assert_eq!(created.current_turn, 0);
        assert_eq!(created.current_round, 1);

        assert_eq!(
            room.start_match("bob", MatchSettings::default()).unwrap_err(),
            GameError::AlreadyStarted
        );
    }

    #[test]
    fn rearrange_only_before_match() {
        let mut room = full_room();
        assert_eq!(room.rearrange("carol", "C"), Ok(TeamScheme::C));
        assert_eq!(room.scheme(), TeamScheme::C);

        room.start_match("carol", MatchSettings::default()).unwrap();
        assert_eq!(room.rearrange("carol", "B"), Err(GameError::AlreadyStarted));
        assert_eq!(room.scheme(), TeamScheme::C);
    }

    #[test]
    fn rearrange_reports_room_errors_before_bad_schemes() {
        let mut room = Room::new("Room1".into());
        room.join("alice").unwrap();
        assert_eq!(
            room.rearrange("alice", "Z"),
            Err(GameError::NotEnoughPlayers(1))
        );

        let mut room = full_room();
        assert_eq!(
            room.rearrange("mallory", "Z"),
            Err(GameError::NotMember("mallory".into()))
        );
        assert_eq!(
            room.rearrange("alice", "Z"),
            Err(GameError::InvalidScheme("Z".into()))
        );

        room.start_match("alice", MatchSettings::default()).unwrap();
        assert_eq!(room.rearrange("alice", "Z"), Err(GameError::AlreadyStarted));
        assert_eq!(room.scheme(), TeamScheme::A);
    }

    #[test]
    fn settings_outside_their_ranges_are_rejected() {
        assert!(MatchSettings::default().check().is_ok());
        let cases = [
            MatchSettings {
                total_round_count: 0,
                ..MatchSettings::default()
            },
            MatchSettings {
                round_duration_seconds: u64::MAX,
                ..MatchSettings::default()
            },
            MatchSettings {
                correct_guess_score: -3,
                ..MatchSettings::default()
            },
            MatchSettings {
                skip_penalty: i32::MAX,
                ..MatchSettings::default()
            },
        ];
        for settings in cases {
            assert!(settings.check().is_err(), "{settings:?}");
        }
    }

    #[test]
    fn scheme_parsing_is_bounded() {
        assert_eq!("A".parse::<TeamScheme>(), Ok(TeamScheme::A));
        assert_eq!(" b ".parse::<TeamScheme>(), Ok(TeamScheme::B));
        assert_eq!(
            "4".parse::<TeamScheme>(),
            Err(GameError::InvalidScheme("4".into()))
        );
    }

    #[test]
    fn correct_and_skip_adjust_explainer_team_only() {
        let settings = MatchSettings::default();
        let mut game = Match::new(settings);
        game.begin_round(word(1, "apple"), SystemTime::now()).unwrap();

        game.record_guess(TeamScheme::A, GuessOutcome::Correct, word(2, "pear"))
            .unwrap();
        game.record_guess(TeamScheme::A, GuessOutcome::Correct, word(3, "plum"))
            .unwrap();
        assert_eq!(game.team_one_score, 2 * settings.correct_guess_score);
        assert_eq!(game.team_two_score, 0);

        game.record_guess(TeamScheme::A, GuessOutcome::Skip, word(4, "fig"))
            .unwrap();
        assert_eq!(
            game.team_one_score,
            2 * settings.correct_guess_score - settings.skip_penalty
        );
        assert_eq!(game.words.len(), 4);
        assert_eq!(game.current_word().map(|w| w.text.as_str()), Some("fig"));
    }

    #[test]
    fn scores_may_go_negative() {
        let mut game = Match::new(MatchSettings::default());
        game.begin_round(word(1, "apple"), SystemTime::now()).unwrap();
        game.record_guess(TeamScheme::B, GuessOutcome::Skip, word(2, "pear"))
            .unwrap();
        assert_eq!(game.team_one_score, -1);
    }

    #[test]
    fn guesses_outside_round_are_invalid_state() {
        let mut game = Match::new(MatchSettings::default());
        let err = game
            .record_guess(TeamScheme::A, GuessOutcome::Correct, word(1, "apple"))
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidState {
                actual: MatchState::Newborn,
                expected: &[MatchState::Playing],
            }
        );
        assert!(game.words.is_empty());
    }

    #[test]
    fn elapsed_rounds_rotate_turns_then_finish() {
        let settings = MatchSettings {
            total_round_count: 2,
            ..MatchSettings::default()
        };
        let mut game = Match::new(settings);

        let key = game.begin_round(word(1, "apple"), SystemTime::now()).unwrap();
        assert_eq!(game.elapse_round(&key, TeamScheme::A), RoundElapsed::Advanced);
        assert_eq!(game.state, MatchState::Waiting);
        assert_eq!(game.current_turn, 2);
        assert_eq!(game.current_round, 2);

        let key = game.begin_round(word(2, "pear"), SystemTime::now()).unwrap();
        assert_eq!(game.elapse_round(&key, TeamScheme::A), RoundElapsed::Finished);
        assert_eq!(game.state, MatchState::Finished);
        assert_eq!(game.current_round, 2);
        assert_eq!(game.current_turn, 2);
    }

    #[test]
    fn stale_timer_does_not_mutate() {
        let mut game = Match::new(MatchSettings::default());
        let first = game.begin_round(word(1, "apple"), SystemTime::now()).unwrap();
        assert_eq!(game.elapse_round(&first, TeamScheme::B), RoundElapsed::Advanced);

        let second = game.begin_round(word(2, "pear"), SystemTime::now()).unwrap();
        let before = game.clone();
        assert_eq!(game.elapse_round(&first, TeamScheme::B), RoundElapsed::Stale);
        assert_eq!(game, before);

        assert_eq!(game.elapse_round(&second, TeamScheme::B), RoundElapsed::Advanced);
        assert_eq!(game.elapse_round(&second, TeamScheme::B), RoundElapsed::Stale);
        assert_eq!(game.current_round, 3);
    }

    #[test]
    fn persisted_room_is_restored_with_its_match() {
        let mut room = full_room();
        room.start_match("alice", MatchSettings::default()).unwrap();
        room.game_mut()
            .unwrap()
            .begin_round(word(1, "apple"), SystemTime::now())
            .unwrap();

        let restored = Room::try_from(RoomEntity::from(&room)).unwrap();
        assert_eq!(restored, room);
    }

    #[test]
    fn persisted_room_over_capacity_is_rejected() {
        let mut entity = RoomEntity::from(&full_room());
        entity.members.push("erin".into());
        assert_eq!(Room::try_from(entity), Err(GameError::CapacityExceeded));
    }

    fn started_entity() -> RoomEntity {
        let mut room = full_room();
        room.start_match("alice", MatchSettings::default()).unwrap();
        RoomEntity::from(&room)
    }

    #[test]
    fn persisted_match_with_out_of_range_counters_is_rejected() {
        let mut entity = started_entity();
        if let Some(game) = entity.game.as_mut() {
            game.current_turn = 7;
        }
        assert_eq!(
            Room::try_from(entity),
            Err(GameError::CorruptedMatch("current_turn out of range"))
        );

        let mut entity = started_entity();
        if let Some(game) = entity.game.as_mut() {
            game.current_round = 0;
        }
        assert_eq!(
            Room::try_from(entity),
            Err(GameError::CorruptedMatch("current_round out of range"))
        );

        let mut entity = started_entity();
        if let Some(game) = entity.game.as_mut() {
            game.settings.round_duration_seconds = 0;
        }
        assert!(Room::try_from(entity).is_err());
    }

    #[test]
    fn persisted_round_without_word_is_rejected() {
        let mut entity = started_entity();
        if let Some(game) = entity.game.as_mut() {
            game.state = MatchState::Playing;
            game.round_start_time = Some(SystemTime::now());
        }
        assert_eq!(
            Room::try_from(entity),
            Err(GameError::CorruptedMatch("round without word or start time"))
        );

        let mut entity = started_entity();
        if let Some(game) = entity.game.as_mut() {
            game.words.push(SelectedWordEntity {
                word_id: 1,
                text: "apple".into(),
            });
        }
        assert!(Room::try_from(entity).is_err());
    }
}
