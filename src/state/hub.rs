use std::{collections::HashMap, sync::Arc};

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{dto::room::RoomSnapshot, state::room::RoomId};

/// Identifier of a single realtime subscription.
pub type SubscriberId = Uuid;

struct Subscriber {
    identity: String,
    tx: mpsc::UnboundedSender<Arc<RoomSnapshot>>,
}

/// Receiving end handed to a connection after admission.
pub struct Subscription {
    id: SubscriberId,
    room_id: RoomId,
    rx: mpsc::UnboundedReceiver<Arc<RoomSnapshot>>,
}

impl Subscription {
    /// Identifier to pass to [`BroadcastHub::unsubscribe`].
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Room this subscription observes.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Wait for the next snapshot; `None` once the hub dropped this subscriber.
    pub async fn recv(&mut self) -> Option<Arc<RoomSnapshot>> {
        self.rx.recv().await
    }
}

/// Per-room publish/subscribe fan-out of room snapshots.
///
/// Every subscriber receives its own view of a published snapshot, computed by the
/// caller-supplied view function from the subscriber's identity.
#[derive(Default)]
pub struct BroadcastHub {
    rooms: DashMap<RoomId, HashMap<SubscriberId, Subscriber>>,
}

impl BroadcastHub {
    /// Hub without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identity` as an observer of `room_id`.
    pub fn subscribe(&self, room_id: RoomId, identity: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.rooms.entry(room_id).or_default().insert(
            id,
            Subscriber {
                identity: identity.to_string(),
                tx,
            },
        );
        Subscription { id, room_id, rx }
    }

    /// Remove a subscriber. Returns `false` when it was already gone.
    pub fn unsubscribe(&self, room_id: RoomId, id: SubscriberId) -> bool {
        let removed = self
            .rooms
            .get_mut(&room_id)
            .is_some_and(|mut subscribers| subscribers.remove(&id).is_some());
        self.rooms
            .remove_if(&room_id, |_, subscribers| subscribers.is_empty());
        removed
    }

    /// Number of live subscribers of `room_id`.
    pub fn subscriber_count(&self, room_id: RoomId) -> usize {
        self.rooms
            .get(&room_id)
            .map_or(0, |subscribers| subscribers.len())
    }

    /// Deliver `snapshot` to every subscriber of `room_id`.
    ///
    /// `view` is called once per subscriber with its identity; returning `Some` replaces the
    /// snapshot for that subscriber only. Subscribers whose connection is gone are pruned.
    /// Returns the number of deliveries.
    pub fn publish<F>(&self, room_id: RoomId, snapshot: Arc<RoomSnapshot>, view: F) -> usize
    where
        F: Fn(&RoomSnapshot, &str) -> Option<RoomSnapshot>,
    {
        let Some(mut subscribers) = self.rooms.get_mut(&room_id) else {
            return 0;
        };

        let mut delivered = 0;
        subscribers.retain(|_, subscriber| {
            let payload = match view(&snapshot, &subscriber.identity) {
                Some(custom) => Arc::new(custom),
                None => snapshot.clone(),
            };
            let sent = subscriber.tx.send(payload).is_ok();
            if sent {
                delivered += 1;
            }
            sent
        });
        delivered
    }
}
