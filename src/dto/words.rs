use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::WordEntity, state::words::{Complexity, WordId}};

/// Payload used to add words to the catalog.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddWordsRequest {
    /// Words to insert, at least one.
    #[validate(length(min = 1), nested)]
    pub words: Vec<WordInput>,
}

/// A single word to add.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct WordInput {
    /// Word to guess.
    #[validate(length(min = 1, max = 128))]
    pub text: String,
    /// Difficulty tier.
    pub complexity: Complexity,
}

/// Word as stored in the catalog.
#[derive(Debug, Serialize, ToSchema)]
pub struct WordSummary {
    /// Catalog identifier, used by `DELETE /words/{id}`.
    #[schema(value_type = u64)]
    pub id: WordId,
    /// Word to guess.
    pub text: String,
    /// Difficulty tier.
    pub complexity: Complexity,
}

impl From<WordEntity> for WordSummary {
    fn from(value: WordEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            complexity: value.complexity,
        }
    }
}

/// Number of catalog words in a tier.
#[derive(Debug, Serialize, ToSchema)]
pub struct TierCount {
    /// Tier counted.
    pub complexity: Complexity,
    /// Number of words in the tier.
    pub count: usize,
}

/// Catalog size per tier.
#[derive(Debug, Serialize, ToSchema)]
pub struct WordStatsResponse {
    /// One entry per tier, easiest first.
    pub tiers: Vec<TierCount>,
}
