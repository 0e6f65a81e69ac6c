use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::{
    dto::room::WordResponse,
    error::AppError,
    routes::auth::AuthenticatedUser,
    services::match_service,
    state::{SharedState, room::RoomId},
};

/// Explainer actions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms/{id}/play", post(play))
        .route("/rooms/{id}/correct", post(correct))
        .route("/rooms/{id}/skip", post(skip))
}

/// Start a round and receive the first word.
#[utoipa::path(
    post,
    path = "/rooms/{id}/play",
    tag = "game",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Round started", body = WordResponse),
        (status = 403, description = "Not the explainer"),
        (status = 409, description = "No round can start now"),
        (status = 503, description = "No word available")
    )
)]
pub async fn play(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<RoomId>,
) -> Result<Json<WordResponse>, AppError> {
    Ok(Json(match_service::play(&state, id, &identity).await?))
}

/// Report a correct guess and receive the next word.
#[utoipa::path(
    post,
    path = "/rooms/{id}/correct",
    tag = "game",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Score credited", body = WordResponse),
        (status = 403, description = "Not the explainer"),
        (status = 409, description = "No round in progress"),
        (status = 503, description = "No word available")
    )
)]
pub async fn correct(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<RoomId>,
) -> Result<Json<WordResponse>, AppError> {
    Ok(Json(match_service::correct(&state, id, &identity).await?))
}

/// Skip the current word and receive the next one.
#[utoipa::path(
    post,
    path = "/rooms/{id}/skip",
    tag = "game",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Penalty applied", body = WordResponse),
        (status = 403, description = "Not the explainer"),
        (status = 409, description = "No round in progress"),
        (status = 503, description = "No word available")
    )
)]
pub async fn skip(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<RoomId>,
) -> Result<Json<WordResponse>, AppError> {
    Ok(Json(match_service::skip(&state, id, &identity).await?))
}
