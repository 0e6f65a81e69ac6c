//! Word catalog management. Every catalog change is followed by an explicit invalidation of
//! the word index cache for the tiers it touched.

use std::collections::BTreeSet;

use tracing::info;

use crate::{
    dao::models::NewWordEntity,
    dto::words::{AddWordsRequest, TierCount, WordStatsResponse, WordSummary},
    error::ServiceError,
    state::{
        SharedState,
        words::{Complexity, WordId},
    },
};

/// Insert `words` when the catalog is empty. Returns the number of words inserted.
pub async fn seed_catalog(
    state: &SharedState,
    words: &[NewWordEntity],
) -> Result<usize, ServiceError> {
    let store = state.game_store();
    for tier in Complexity::ALL {
        if !store.word_ids(tier).await?.is_empty() {
            return Ok(0);
        }
    }

    let inserted = store.insert_words(words.to_vec()).await?;
    state.words().invalidate_all();
    info!(count = inserted.len(), "word catalog seeded");
    Ok(inserted.len())
}

/// Add words to the catalog.
pub async fn add_words(
    state: &SharedState,
    request: AddWordsRequest,
) -> Result<Vec<WordSummary>, ServiceError> {
    let words: Vec<NewWordEntity> = request
        .words
        .into_iter()
        .map(|word| NewWordEntity {
            text: word.text.trim().to_string(),
            complexity: word.complexity,
        })
        .collect();
    if words.iter().any(|word| word.text.is_empty()) {
        return Err(ServiceError::InvalidInput("word text must not be blank".into()));
    }

    let inserted = state.game_store().insert_words(words).await?;
    let touched: BTreeSet<Complexity> = inserted.iter().map(|word| word.complexity).collect();
    for tier in touched {
        state.words().invalidate(tier);
    }

    info!(count = inserted.len(), "words added to catalog");
    Ok(inserted.into_iter().map(Into::into).collect())
}

/// Remove a word from the catalog.
pub async fn delete_word(state: &SharedState, id: WordId) -> Result<WordSummary, ServiceError> {
    let removed = state
        .game_store()
        .delete_word(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("word `{id}` not found")))?;
    state.words().invalidate(removed.complexity);

    info!(word_id = id, complexity = ?removed.complexity, "word removed from catalog");
    Ok(removed.into())
}

/// Number of catalog words per tier, read from the store rather than the cache.
pub async fn word_stats(state: &SharedState) -> Result<WordStatsResponse, ServiceError> {
    let mut tiers = Vec::with_capacity(Complexity::ALL.len());
    for complexity in Complexity::ALL {
        let count = state.game_store().word_ids(complexity).await?.len();
        tiers.push(TierCount { complexity, count });
    }
    Ok(WordStatsResponse { tiers })
}
