//! Weighted word drawing backed by a process-wide per-complexity index cache.
//!
//! The cache is never refreshed on its own: whoever mutates the catalog must call
//! [`WordPool::invalidate`] (or [`WordPool::invalidate_all`]) afterwards.

use std::sync::Arc;

use dashmap::DashMap;
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::{
    dao::{game_store::GameStore, models::WordEntity, storage::StorageError},
    error::ServiceError,
    state::room::GameError,
};

/// Catalog identifier of a word.
pub type WordId = u64;

/// Difficulty tier of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Drawn 4 times out of 7.
    Easy,
    /// Drawn 2 times out of 7.
    Intermediate,
    /// Drawn 1 time out of 7.
    Hard,
}

impl Complexity {
    /// Every tier, easiest first.
    pub const ALL: [Complexity; 3] = [
        Complexity::Easy,
        Complexity::Intermediate,
        Complexity::Hard,
    ];

    /// Relative draw weight of the tier.
    pub fn weight(self) -> u32 {
        match self {
            Complexity::Easy => 4,
            Complexity::Intermediate => 2,
            Complexity::Hard => 1,
        }
    }

    /// Tier selected by `roll`, a value in `0..total_weight()`.
    fn for_roll(mut roll: u32) -> Complexity {
        for tier in Complexity::ALL {
            if roll < tier.weight() {
                return tier;
            }
            roll -= tier.weight();
        }
        Complexity::Hard
    }

    fn total_weight() -> u32 {
        Complexity::ALL.iter().map(|tier| tier.weight()).sum()
    }

    /// Weighted random tier.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Complexity {
        Complexity::for_roll(rng.random_range(0..Complexity::total_weight()))
    }
}

/// A catalog word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Catalog identifier.
    pub id: WordId,
    /// Word to guess.
    pub text: String,
    /// Difficulty tier.
    pub complexity: Complexity,
}

impl From<WordEntity> for Word {
    fn from(value: WordEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            complexity: value.complexity,
        }
    }
}

/// Cached id set of a tier, tagged with the invalidation count it was loaded under.
#[derive(Default)]
struct TierSlot {
    generation: u64,
    ids: Option<Arc<[WordId]>>,
}

/// Draws words from the catalog, caching the sorted id set of each tier.
#[derive(Default)]
pub struct WordPool {
    index_cache: DashMap<Complexity, TierSlot>,
}

impl WordPool {
    /// Pool with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a word: weighted tier first, then a uniform pick inside that tier.
    ///
    /// An empty tier fails with [`GameError::WordsUnavailable`]; other tiers are not tried.
    pub async fn draw(&self, store: &dyn GameStore) -> Result<Word, ServiceError> {
        let tier = Complexity::pick(&mut rand::rng());
        self.draw_from(store, tier).await
    }

    /// Draw a word uniformly from `tier`.
    pub async fn draw_from(
        &self,
        store: &dyn GameStore,
        tier: Complexity,
    ) -> Result<Word, ServiceError> {
        let ids = self.tier_ids(store, tier).await?;
        let Some(id) = ids.choose(&mut rand::rng()).copied() else {
            return Err(GameError::WordsUnavailable(tier).into());
        };

        match store.find_word(id).await? {
            Some(entity) => Ok(entity.into()),
            None => {
                warn!(word_id = id, ?tier, "cached word id no longer in catalog");
                Err(GameError::WordsUnavailable(tier).into())
            }
        }
    }

    /// Drop the cached id set of `tier` so the next draw reloads it.
    ///
    /// A load still in flight when this runs will not be cached.
    pub fn invalidate(&self, tier: Complexity) {
        let mut slot = self.index_cache.entry(tier).or_default();
        slot.generation += 1;
        if slot.ids.take().is_some() {
            debug!(?tier, "word index cache invalidated");
        }
    }

    /// Drop every cached id set.
    pub fn invalidate_all(&self) {
        for tier in Complexity::ALL {
            self.invalidate(tier);
        }
    }

    /// Whether an id set is currently cached for `tier`.
    pub fn is_cached(&self, tier: Complexity) -> bool {
        self.index_cache
            .get(&tier)
            .is_some_and(|slot| slot.ids.is_some())
    }

    async fn tier_ids(
        &self,
        store: &dyn GameStore,
        tier: Complexity,
    ) -> Result<Arc<[WordId]>, StorageError> {
        let generation = {
            let slot = self.index_cache.entry(tier).or_default();
            if let Some(ids) = &slot.ids {
                return Ok(ids.clone());
            }
            slot.generation
        };

        let mut ids = store.word_ids(tier).await?;
        ids.sort_unstable();
        let ids: Arc<[WordId]> = ids.into();

        let mut slot = self.index_cache.entry(tier).or_default();
        if slot.generation == generation {
            slot.ids = Some(ids.clone());
        } else {
            debug!(?tier, "catalog changed during load; id set not cached");
        }
        Ok(ids)
    }
}
