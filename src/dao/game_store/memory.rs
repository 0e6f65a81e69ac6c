//! Process-local [`GameStore`] backed by concurrent maps.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::{
    dao::{
        game_store::GameStore,
        models::{NewWordEntity, RoomEntity, WordEntity},
        storage::{StorageError, StorageResult},
    },
    state::words::{Complexity, WordId},
};

#[derive(Default)]
struct Inner {
    rooms: DashMap<Uuid, RoomEntity>,
    words: DashMap<WordId, WordEntity>,
    next_word_id: AtomicU64,
    offline: AtomicBool,
}

/// In-memory store. Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<Inner>,
}

impl MemoryGameStore {
    /// Empty store, online.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every operation fails with [`StorageError::Unavailable`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StorageResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                "memory store is offline".into(),
                io::Error::other("offline"),
            ));
        }
        Ok(())
    }
}

impl GameStore for MemoryGameStore {
    fn save_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            store.inner.rooms.insert(room.id, room);
            Ok(())
        })
    }

    fn list_rooms(&self) -> BoxFuture<'static, StorageResult<Vec<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store
                .inner
                .rooms
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        })
    }

    fn insert_words(
        &self,
        words: Vec<NewWordEntity>,
    ) -> BoxFuture<'static, StorageResult<Vec<WordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            let inserted = words
                .into_iter()
                .map(|word| {
                    let id = store.inner.next_word_id.fetch_add(1, Ordering::SeqCst) + 1;
                    let entity = WordEntity {
                        id,
                        text: word.text,
                        complexity: word.complexity,
                    };
                    store.inner.words.insert(id, entity.clone());
                    entity
                })
                .collect();
            Ok(inserted)
        })
    }

    fn delete_word(&self, id: WordId) -> BoxFuture<'static, StorageResult<Option<WordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store.inner.words.remove(&id).map(|(_, word)| word))
        })
    }

    fn word_ids(&self, complexity: Complexity) -> BoxFuture<'static, StorageResult<Vec<WordId>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store
                .inner
                .words
                .iter()
                .filter(|entry| entry.complexity == complexity)
                .map(|entry| *entry.key())
                .collect())
        })
    }

    fn find_word(&self, id: WordId) -> BoxFuture<'static, StorageResult<Option<WordEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            Ok(store.inner.words.get(&id).map(|word| word.value().clone()))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }
}
