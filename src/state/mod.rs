/// Per-room snapshot fan-out.
pub mod hub;
/// Rooms and matches.
pub mod room;
/// Teams and scores.
pub mod score;
/// Match lifecycle transitions.
pub mod state_machine;
/// Signed admission tickets.
pub mod tickets;
/// Explainer and guesser rotation.
pub mod turns;
/// Word drawing and its cache.
pub mod words;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::{
    config::AppConfig,
    dao::game_store::GameStore,
    state::{
        hub::BroadcastHub,
        room::{GameError, Room, RoomId},
        tickets::TicketAuthority,
        words::WordPool,
    },
};

/// State shared by every handler and background task.
pub type SharedState = Arc<AppState>;

/// Handle to a room; every mutation of the room and its match happens under this lock.
pub type RoomHandle = Arc<Mutex<Room>>;

/// Central application state: live rooms, word cache, realtime hub and ticket signer.
pub struct AppState {
    config: AppConfig,
    game_store: Arc<dyn GameStore>,
    rooms: DashMap<RoomId, RoomHandle>,
    words: WordPool,
    hub: BroadcastHub,
    tickets: TicketAuthority,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, game_store: Arc<dyn GameStore>) -> SharedState {
        let tickets = TicketAuthority::new(config.resolve_ticket_secret(), config.ticket_validity());
        Arc::new(Self {
            config,
            game_store,
            rooms: DashMap::new(),
            words: WordPool::new(),
            hub: BroadcastHub::new(),
            tickets,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Persistence collaborator.
    pub fn game_store(&self) -> &dyn GameStore {
        self.game_store.as_ref()
    }

    /// Process-wide word index cache.
    pub fn words(&self) -> &WordPool {
        &self.words
    }

    /// Per-room realtime fan-out.
    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    /// Ticket signer of the realtime gate.
    pub fn tickets(&self) -> &TicketAuthority {
        &self.tickets
    }

    /// Live handle of room `id`.
    pub fn room(&self, id: RoomId) -> Result<RoomHandle, GameError> {
        self.rooms
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(GameError::RoomNotFound(id))
    }

    /// Register a room, replacing any previous room with the same id.
    pub fn insert_room(&self, room: Room) -> RoomHandle {
        let id = room.id();
        let handle = Arc::new(Mutex::new(room));
        self.rooms.insert(id, handle.clone());
        handle
    }

    /// Handles of every live room, in no particular order.
    pub fn rooms(&self) -> Vec<RoomHandle> {
        self.rooms.iter().map(|entry| entry.value().clone()).collect()
    }
}
