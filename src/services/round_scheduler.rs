//! Deferred round ends.
//!
//! A timer carries the [`RoundKey`] of the round it was armed for and is checked against the
//! live match when it fires, so a timer outliving its round never advances the match.

use std::time::{Duration, SystemTime};

use tokio::{task::JoinHandle, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    dao::models::RoomEntity,
    services::broadcast,
    state::{
        SharedState,
        room::{RoomId, RoundElapsed, RoundKey},
        state_machine::MatchState,
    },
};

/// Fire the end of the round identified by `key` after `delay`.
pub fn arm_round_timer(
    state: SharedState,
    room_id: RoomId,
    key: RoundKey,
    delay: Duration,
) -> JoinHandle<RoundElapsed> {
    debug!(room_id = %room_id, round = key.round, ?delay, "round timer armed");
    tokio::spawn(async move {
        sleep(delay).await;
        fire_round_timer(&state, room_id, key).await
    })
}

/// Apply a round end to the live room and publish the result.
///
/// Never fails: storage errors are logged and the in-memory transition is kept.
pub async fn fire_round_timer(state: &SharedState, room_id: RoomId, key: RoundKey) -> RoundElapsed {
    let Ok(handle) = state.room(room_id) else {
        debug!(room_id = %room_id, "round timer fired for a room that no longer exists");
        return RoundElapsed::NoMatch;
    };
    let mut room = handle.lock().await;

    let scheme = room.scheme();
    let outcome = match room.game_mut() {
        Some(game) => game.elapse_round(&key, scheme),
        None => RoundElapsed::NoMatch,
    };

    match outcome {
        RoundElapsed::Advanced | RoundElapsed::Finished => {
            info!(room_id = %room_id, round = key.round, ?outcome, "round finished");
            if let Err(err) = state
                .game_store()
                .save_room(RoomEntity::from(&*room))
                .await
            {
                warn!(room_id = %room_id, error = %err, "failed to persist round end");
            }
        }
        RoundElapsed::Stale => {
            debug!(room_id = %room_id, round = key.round, "stale round timer ignored");
        }
        RoundElapsed::NoMatch => {
            debug!(room_id = %room_id, "round timer fired for a room without match");
        }
    }

    broadcast::publish_room(state, &room);
    outcome
}

/// Re-arm the timers of every round still running, typically after a restart.
///
/// Overdue rounds end right away. Returns the number of timers armed.
pub async fn resume_pending_rounds(state: &SharedState) -> usize {
    let now = SystemTime::now();
    let mut armed = 0;
    for handle in state.rooms() {
        let room = handle.lock().await;
        let Some(game) = room.game().filter(|game| game.state == MatchState::Playing) else {
            continue;
        };

        let ends_at = game
            .round_start_time
            .and_then(|start| start.checked_add(game.settings.round_duration()))
            .unwrap_or(now);
        let remaining = ends_at.duration_since(now).unwrap_or(Duration::ZERO);
        arm_round_timer(state.clone(), room.id(), game.round_key(), remaining);
        armed += 1;
    }
    armed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::{game_store::memory::MemoryGameStore, models::NewWordEntity},
        services::{
            match_service::{correct, play},
            room_service::{get_room, restore_rooms},
            tests::{started_room, state_with_store, state_with_words},
        },
        state::{room::MatchSettings, words::Complexity},
    };

    fn catalog() -> Vec<NewWordEntity> {
        Complexity::ALL
            .into_iter()
            .map(|complexity| NewWordEntity {
                text: format!("{complexity:?}"),
                complexity,
            })
            .collect()
    }

    fn short_match(rounds: u32) -> MatchSettings {
        MatchSettings {
            total_round_count: rounds,
            round_duration_seconds: 1,
            ..MatchSettings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn single_round_match_finishes_without_rotating() {
        let state = state_with_words(catalog(), short_match(1)).await;
        let room_id = started_room(&state).await;
        let mut observer = state.hub().subscribe(room_id, "bob");

        play(&state, room_id, "alice").await.unwrap();
        assert_eq!(
            observer.recv().await.unwrap().game.clone().unwrap().state,
            MatchState::Playing
        );

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        let published = observer.recv().await.unwrap().game.clone().unwrap();
        assert_eq!(published.state, MatchState::Finished);
        assert_eq!(published.current_round, 1);
        assert_eq!(published.current_turn, 0);

        let err = play(&state, room_id, "alice").await.unwrap_err();
        assert!(matches!(err, crate::error::ServiceError::InvalidState(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn rounds_rotate_until_the_match_finishes() {
        let state = state_with_words(catalog(), short_match(4)).await;
        let room_id = started_room(&state).await;

        let mut explainers = Vec::new();
        loop {
            let snapshot = get_room(&state, room_id, None).await.unwrap();
            let game = snapshot.game.unwrap();
            if game.state == MatchState::Finished {
                assert_eq!(game.current_round, 4);
                break;
            }
            let explainer = snapshot.members[game.current_turn].clone();
            play(&state, room_id, &explainer).await.unwrap();
            explainers.push(explainer);
            tokio::time::sleep(Duration::from_millis(1_100)).await;
        }

        // scheme A hands the role over as 0 -> 2 -> 1 -> 3
        assert_eq!(explainers, ["alice", "carol", "bob", "dave"]);
    }

    #[tokio::test]
    async fn stale_timer_is_a_no_op() {
        let settings = MatchSettings {
            total_round_count: 3,
            ..MatchSettings::default()
        };
        let state = state_with_words(catalog(), settings).await;
        let room_id = started_room(&state).await;

        play(&state, room_id, "alice").await.unwrap();
        let handle = state.room(room_id).unwrap();
        let first_key = handle.lock().await.game().unwrap().round_key();

        assert_eq!(
            fire_round_timer(&state, room_id, first_key).await,
            RoundElapsed::Advanced
        );
        play(&state, room_id, "carol").await.unwrap();
        correct(&state, room_id, "carol").await.unwrap();

        let before = get_room(&state, room_id, Some("carol")).await.unwrap();
        assert_eq!(
            fire_round_timer(&state, room_id, first_key).await,
            RoundElapsed::Stale
        );
        assert_eq!(get_room(&state, room_id, Some("carol")).await.unwrap(), before);
    }

    #[tokio::test]
    async fn timer_for_an_unknown_room_is_ignored() {
        let state = state_with_words(catalog(), short_match(1)).await;
        let key = RoundKey {
            round: 1,
            turn: 0,
            token: 1,
        };
        assert_eq!(
            fire_round_timer(&state, RoomId::new_v4(), key).await,
            RoundElapsed::NoMatch
        );
    }

    #[tokio::test]
    async fn storage_outage_does_not_stop_the_round_end() {
        let store = MemoryGameStore::new();
        let state = state_with_store(store.clone());
        crate::services::word_service::seed_catalog(&state, &catalog())
            .await
            .unwrap();
        let room_id = started_room(&state).await;
        play(&state, room_id, "alice").await.unwrap();

        store.set_offline(true);
        let handle = state.room(room_id).unwrap();
        let key = handle.lock().await.game().unwrap().round_key();
        assert_eq!(
            fire_round_timer(&state, room_id, key).await,
            RoundElapsed::Advanced
        );
        assert_eq!(
            handle.lock().await.game().unwrap().state,
            MatchState::Waiting
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restored_rounds_are_rearmed() {
        let store = MemoryGameStore::new();
        let first = state_with_store(store.clone());
        crate::services::word_service::seed_catalog(&first, &catalog())
            .await
            .unwrap();
        let room_id = started_room(&first).await;
        play(&first, room_id, "alice").await.unwrap();

        let second = state_with_store(store);
        restore_rooms(&second).await.unwrap();
        let mut observer = second.hub().subscribe(room_id, "bob");

        tokio::time::sleep(Duration::from_secs(200)).await;
        let game = observer.recv().await.unwrap().game.clone().unwrap();
        assert_eq!(game.state, MatchState::Waiting);
        assert_eq!(game.current_round, 2);
    }
}
