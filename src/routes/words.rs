use axum::{
    Json, Router,
    extract::{Path, State},
    middleware,
    routing::{delete, get, post},
};
use axum_valid::Valid;

use crate::{
    dto::words::{AddWordsRequest, WordStatsResponse, WordSummary},
    error::AppError,
    routes::auth::require_admin_token,
    services::word_service,
    state::{SharedState, words::WordId},
};

/// Catalog management, restricted to holders of the admin token.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/words", post(add_words))
        .route("/words/stats", get(word_stats))
        .route("/words/{id}", delete(delete_word))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Add words to the catalog.
#[utoipa::path(
    post,
    path = "/words",
    tag = "words",
    params(("X-Admin-Token" = String, Header, description = "Configured admin token")),
    request_body = AddWordsRequest,
    responses(
        (status = 200, description = "Words added", body = [WordSummary]),
        (status = 401, description = "Missing or invalid admin token")
    )
)]
pub async fn add_words(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<AddWordsRequest>>,
) -> Result<Json<Vec<WordSummary>>, AppError> {
    Ok(Json(word_service::add_words(&state, payload).await?))
}

/// Remove a word from the catalog.
#[utoipa::path(
    delete,
    path = "/words/{id}",
    tag = "words",
    params(
        ("X-Admin-Token" = String, Header, description = "Configured admin token"),
        ("id" = u64, Path, description = "Identifier of the word")
    ),
    responses(
        (status = 200, description = "Word removed", body = WordSummary),
        (status = 404, description = "Unknown word")
    )
)]
pub async fn delete_word(
    State(state): State<SharedState>,
    Path(id): Path<WordId>,
) -> Result<Json<WordSummary>, AppError> {
    Ok(Json(word_service::delete_word(&state, id).await?))
}

/// Catalog size per complexity tier.
#[utoipa::path(
    get,
    path = "/words/stats",
    tag = "words",
    params(("X-Admin-Token" = String, Header, description = "Configured admin token")),
    responses((status = 200, description = "Catalog statistics", body = WordStatsResponse))
)]
pub async fn word_stats(
    State(state): State<SharedState>,
) -> Result<Json<WordStatsResponse>, AppError> {
    Ok(Json(word_service::word_stats(&state).await?))
}
