pub mod memory;

use crate::dao::models::{NewWordEntity, RoomEntity, WordEntity};
use crate::dao::storage::StorageResult;
use crate::state::words::{Complexity, WordId};
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for rooms and the word catalog.
///
/// Implementations store what they are given: membership and capacity rules are enforced
/// by the callers before anything reaches the store.
pub trait GameStore: Send + Sync {
    /// Insert or replace a room (last write wins).
    fn save_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Every stored room.
    fn list_rooms(&self) -> BoxFuture<'static, StorageResult<Vec<RoomEntity>>>;
    /// Add words to the catalog, returning them with their assigned ids.
    fn insert_words(
        &self,
        words: Vec<NewWordEntity>,
    ) -> BoxFuture<'static, StorageResult<Vec<WordEntity>>>;
    /// Remove a word, returning it when it existed.
    fn delete_word(&self, id: WordId) -> BoxFuture<'static, StorageResult<Option<WordEntity>>>;
    /// Ids of every word in `complexity`, in no particular order.
    fn word_ids(&self, complexity: Complexity) -> BoxFuture<'static, StorageResult<Vec<WordId>>>;
    /// Fetch a single word.
    fn find_word(&self, id: WordId) -> BoxFuture<'static, StorageResult<Option<WordEntity>>>;
    /// Cheap round trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
