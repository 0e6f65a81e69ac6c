//! Explainer actions: `play` opens a round, `correct` and `skip` move to the next word.

use std::time::SystemTime;

use tracing::info;

use crate::{
    dto::room::WordResponse,
    error::ServiceError,
    services::{broadcast, room_service, round_scheduler},
    state::{
        SharedState,
        room::{GameError, GuessOutcome, RoomId},
        state_machine::MatchEvent,
        turns,
    },
};

/// Start a round: serve the first word and arm the round timer.
pub async fn play(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
) -> Result<WordResponse, ServiceError> {
    let handle = state.room(room_id)?;
    let mut room = handle.lock().await;
    turns::check_turn(&mut room, identity, MatchEvent::Play.accepted_from())?;

    let word = state.words().draw(state.game_store()).await?;
    let text = word.text.clone();

    let mut next = room.clone();
    let game = next.game_mut().ok_or(GameError::MatchNotStarted)?;
    let key = game.begin_round(word.into(), SystemTime::now())?;
    let duration = game.settings.round_duration();
    room_service::commit(state, &mut room, next).await?;

    info!(room_id = %room_id, round = key.round, explainer = identity, "round started");
    broadcast::publish_room(state, &room);
    round_scheduler::arm_round_timer(state.clone(), room_id, key, duration);

    Ok(WordResponse { word: text })
}

/// The guesser found the word: credit the explainer's team and serve the next word.
pub async fn correct(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
) -> Result<WordResponse, ServiceError> {
    record(state, room_id, identity, GuessOutcome::Correct).await
}

/// The explainer gave up on the word: debit the explainer's team and serve the next word.
pub async fn skip(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
) -> Result<WordResponse, ServiceError> {
    record(state, room_id, identity, GuessOutcome::Skip).await
}

async fn record(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
    outcome: GuessOutcome,
) -> Result<WordResponse, ServiceError> {
    let handle = state.room(room_id)?;
    let mut room = handle.lock().await;
    turns::check_turn(&mut room, identity, outcome.event().accepted_from())?;

    let word = state.words().draw(state.game_store()).await?;
    let text = word.text.clone();

    let mut next = room.clone();
    let scheme = next.scheme();
    let game = next.game_mut().ok_or(GameError::MatchNotStarted)?;
    let delta = game.record_guess(scheme, outcome, word.into())?;
    room_service::commit(state, &mut room, next).await?;

    info!(room_id = %room_id, ?outcome, delta, "word scored");
    broadcast::publish_room(state, &room);

    Ok(WordResponse { word: text })
}
