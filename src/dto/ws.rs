use serde::Serialize;

use crate::dto::room::RoomSnapshot;

/// Frame pushed to room observers whenever the room changes.
#[derive(Debug, Serialize)]
pub struct RoomEvent<'a> {
    /// Room state as seen by the receiving observer.
    pub data: &'a RoomSnapshot,
}
