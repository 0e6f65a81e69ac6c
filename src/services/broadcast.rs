//! Room snapshots and the per-viewer view applied before they leave the process.

use std::sync::Arc;

use tracing::debug;

use crate::{
    dto::room::RoomSnapshot,
    state::{SharedState, room::Room, turns},
};

/// Text shown to the guesser in place of the word being explained.
pub const GUESSING_PLACEHOLDER: &str = "<-Guessing->";

/// Username of the guesser of the match carried by `snapshot`.
pub fn guesser_of(snapshot: &RoomSnapshot) -> Option<&str> {
    let game = snapshot.game.as_ref()?;
    snapshot
        .members
        .get(turns::guesser_index(game.current_turn))
        .map(String::as_str)
}

/// Copy of `snapshot` with the latest word replaced by [`GUESSING_PLACEHOLDER`].
///
/// Returns `None` when there is no word to hide.
pub fn redacted(snapshot: &RoomSnapshot) -> Option<RoomSnapshot> {
    let has_word = snapshot
        .game
        .as_ref()
        .is_some_and(|game| !game.words.is_empty());
    if !has_word {
        return None;
    }

    let mut copy = snapshot.clone();
    if let Some(word) = copy.game.as_mut().and_then(|game| game.words.last_mut()) {
        word.text = GUESSING_PLACEHOLDER.to_string();
    }
    Some(copy)
}

/// View of `snapshot` for `viewer`: only the guesser gets a different one.
pub fn view_for(snapshot: &RoomSnapshot, viewer: &str) -> Option<RoomSnapshot> {
    if guesser_of(snapshot) == Some(viewer) {
        redacted(snapshot)
    } else {
        None
    }
}

/// Snapshot of `room` as seen by `viewer`.
///
/// Readers outside the room, anonymous or not, never see the current word.
pub fn snapshot_for(room: &Room, viewer: Option<&str>) -> RoomSnapshot {
    let snapshot = RoomSnapshot::from(room);
    let view = match viewer.filter(|viewer| room.is_member(viewer)) {
        Some(member) => view_for(&snapshot, member),
        None => redacted(&snapshot),
    };
    view.unwrap_or(snapshot)
}

/// Publish the committed state of `room` to its subscribers.
///
/// Must be called while holding the room lock so snapshots leave in mutation order.
pub fn publish_room(state: &SharedState, room: &Room) -> usize {
    let snapshot = Arc::new(RoomSnapshot::from(room));
    let delivered = state.hub().publish(room.id(), snapshot, view_for);
    debug!(room_id = %room.id(), delivered, "room snapshot published");
    delivered
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::state::room::{MatchSettings, SelectedWord, tests::full_room};

    fn playing_room() -> Room {
        let mut room = full_room();
        room.start_match("alice", MatchSettings::default()).unwrap();
        room.game_mut()
            .unwrap()
            .begin_round(
                SelectedWord {
                    word_id: 1,
                    text: "lighthouse".into(),
                },
                SystemTime::now(),
            )
            .unwrap();
        room
    }

    fn last_word(snapshot: &RoomSnapshot) -> &str {
        snapshot
            .game
            .as_ref()
            .and_then(|game| game.words.last())
            .map(|word| word.text.as_str())
            .unwrap()
    }

    #[test]
    fn guesser_sits_opposite_the_explainer() {
        let snapshot = RoomSnapshot::from(&playing_room());
        // turn 0 is alice, so the guesser is carol
        assert_eq!(guesser_of(&snapshot), Some("carol"));
    }

    #[test]
    fn only_the_guesser_gets_the_placeholder() {
        let snapshot = RoomSnapshot::from(&playing_room());

        let guesser_view = view_for(&snapshot, "carol").unwrap();
        assert_eq!(last_word(&guesser_view), GUESSING_PLACEHOLDER);
        assert_eq!(guesser_view.members, snapshot.members);

        for viewer in ["alice", "bob", "dave"] {
            assert!(view_for(&snapshot, viewer).is_none(), "{viewer}");
        }
        assert_eq!(last_word(&snapshot), "lighthouse");
    }

    #[test]
    fn anonymous_readers_see_the_placeholder() {
        let room = playing_room();
        assert_eq!(last_word(&snapshot_for(&room, None)), GUESSING_PLACEHOLDER);
        assert_eq!(last_word(&snapshot_for(&room, Some("alice"))), "lighthouse");
    }

    #[test]
    fn strangers_read_like_anonymous_readers() {
        let room = playing_room();
        assert_eq!(
            last_word(&snapshot_for(&room, Some("mallory"))),
            GUESSING_PLACEHOLDER
        );
        assert_eq!(last_word(&snapshot_for(&room, Some("carol"))), GUESSING_PLACEHOLDER);
    }

    #[test]
    fn nothing_to_hide_before_the_first_word() {
        let mut room = full_room();
        assert!(view_for(&RoomSnapshot::from(&room), "carol").is_none());
        room.start_match("alice", MatchSettings::default()).unwrap();
        assert!(redacted(&RoomSnapshot::from(&room)).is_none());
    }

    #[tokio::test]
    async fn publish_applies_the_guesser_view() {
        let state = crate::services::tests::test_state();
        let room = playing_room();
        let mut carol = state.hub().subscribe(room.id(), "carol");
        let mut bob = state.hub().subscribe(room.id(), "bob");

        assert_eq!(publish_room(&state, &room), 2);
        assert_eq!(last_word(&carol.recv().await.unwrap()), GUESSING_PLACEHOLDER);
        assert_eq!(last_word(&bob.recv().await.unwrap()), "lighthouse");
    }
}
