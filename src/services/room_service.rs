use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::{
    dao::models::RoomEntity,
    dto::room::{CreateRoomRequest, RoomSnapshot},
    error::ServiceError,
    services::{broadcast, round_scheduler},
    state::{
        SharedState,
        room::{GameError, JoinOutcome, ROOM_CAPACITY, Room, RoomId},
    },
};

/// Open a room with an optional initial set of players.
pub async fn create_room(
    state: &SharedState,
    identity: &str,
    request: CreateRoomRequest,
) -> Result<RoomSnapshot, ServiceError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("room name must not be blank".into()));
    }

    let players: BTreeSet<String> = request
        .players
        .iter()
        .map(|player| player.trim().to_string())
        .collect();
    if players.len() > ROOM_CAPACITY {
        return Err(GameError::CapacityExceeded.into());
    }

    let mut room = Room::new(name.to_string());
    for player in &players {
        room.join(player)?;
    }

    state
        .game_store()
        .save_room(RoomEntity::from(&room))
        .await?;
    info!(room_id = %room.id(), created_by = identity, players = players.len(), "room created");

    let snapshot = broadcast::snapshot_for(&room, Some(identity));
    state.insert_room(room);
    Ok(snapshot)
}

/// Every room as seen by `viewer`, sorted by name.
pub async fn list_rooms(state: &SharedState, viewer: Option<&str>) -> Vec<RoomSnapshot> {
    let mut snapshots = Vec::new();
    for handle in state.rooms() {
        let room = handle.lock().await;
        snapshots.push(broadcast::snapshot_for(&room, viewer));
    }
    snapshots.sort_by(|a, b| a.name.cmp(&b.name).then(a.room_id.cmp(&b.room_id)));
    snapshots
}

/// A single room as seen by `viewer`.
pub async fn get_room(
    state: &SharedState,
    room_id: RoomId,
    viewer: Option<&str>,
) -> Result<RoomSnapshot, ServiceError> {
    let handle = state.room(room_id)?;
    let room = handle.lock().await;
    Ok(broadcast::snapshot_for(&room, viewer))
}

/// Add `identity` to the room. Joining a room twice succeeds without any change.
pub async fn join_room(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
) -> Result<RoomSnapshot, ServiceError> {
    let handle = state.room(room_id)?;
    let mut room = handle.lock().await;

    let mut next = room.clone();
    if next.join(identity)? == JoinOutcome::Joined {
        commit(state, &mut room, next).await?;
        info!(room_id = %room_id, identity, members = room.members().len(), "player joined");
        broadcast::publish_room(state, &room);
    }

    Ok(broadcast::snapshot_for(&room, Some(identity)))
}

/// Change the team pairing before the match starts.
pub async fn rearrange(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
    scheme: &str,
) -> Result<RoomSnapshot, ServiceError> {
    let handle = state.room(room_id)?;
    let mut room = handle.lock().await;

    let mut next = room.clone();
    next.rearrange(identity, scheme)?;
    commit(state, &mut room, next).await?;
    info!(room_id = %room_id, scheme = ?room.scheme(), "teams rearranged");
    broadcast::publish_room(state, &room);

    Ok(broadcast::snapshot_for(&room, Some(identity)))
}

/// Create the room's match with the configured settings.
pub async fn start_match(
    state: &SharedState,
    room_id: RoomId,
    identity: &str,
) -> Result<RoomSnapshot, ServiceError> {
    let handle = state.room(room_id)?;
    let mut room = handle.lock().await;

    let mut next = room.clone();
    next.start_match(identity, state.config().match_settings())?;
    commit(state, &mut room, next).await?;
    info!(room_id = %room_id, started_by = identity, "match started");
    broadcast::publish_room(state, &room);

    Ok(broadcast::snapshot_for(&room, Some(identity)))
}

/// Persist `next` and make it the live state of the room.
///
/// The live room is left untouched when the store rejects the write.
pub(crate) async fn commit(
    state: &SharedState,
    live: &mut Room,
    next: Room,
) -> Result<(), ServiceError> {
    state
        .game_store()
        .save_room(RoomEntity::from(&next))
        .await?;
    *live = next;
    Ok(())
}

/// Load persisted rooms into memory and re-arm the timers of rounds in progress.
///
/// Rooms that violate the room invariants are skipped with a warning.
pub async fn restore_rooms(state: &SharedState) -> Result<usize, ServiceError> {
    let entities = state.game_store().list_rooms().await?;
    let mut restored = 0;
    for entity in entities {
        let id = entity.id;
        match Room::try_from(entity) {
            Ok(room) => {
                state.insert_room(room);
                restored += 1;
            }
            Err(err) => warn!(room_id = %id, error = %err, "skipping invalid persisted room"),
        }
    }

    let resumed = round_scheduler::resume_pending_rounds(state).await;
    info!(restored, resumed, "rooms restored from storage");
    Ok(restored)
}
