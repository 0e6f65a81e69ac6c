use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::room::{CreateRoomRequest, RearrangeRequest, RoomSnapshot, TicketResponse},
    error::AppError,
    routes::auth::{AuthenticatedUser, MaybeUser},
    services::{room_service, ticket_service},
    state::{SharedState, room::RoomId},
};

/// Room lifecycle routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room))
        .route("/rooms/{id}/join", post(join_room))
        .route("/rooms/{id}/start", post(start_match))
        .route("/rooms/{id}/teams", put(rearrange))
        .route("/rooms/{id}/ticket", post(issue_ticket))
}

/// List every room. The current word is hidden from anonymous readers.
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    params(("X-Username" = Option<String>, Header, description = "Authenticated username")),
    responses((status = 200, description = "Known rooms", body = [RoomSnapshot]))
)]
pub async fn list_rooms(
    State(state): State<SharedState>,
    MaybeUser(viewer): MaybeUser,
) -> Json<Vec<RoomSnapshot>> {
    Json(room_service::list_rooms(&state, viewer.as_deref()).await)
}

/// Open a new room.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    params(("X-Username" = String, Header, description = "Authenticated username")),
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = RoomSnapshot),
        (status = 400, description = "Invalid name or players"),
        (status = 409, description = "More than four players")
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Valid(Json(payload)): Valid<Json<CreateRoomRequest>>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(
        room_service::create_room(&state, &identity, payload).await?,
    ))
}

/// Retrieve a room.
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = Option<String>, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Room", body = RoomSnapshot),
        (status = 404, description = "Unknown room")
    )
)]
pub async fn get_room(
    State(state): State<SharedState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<RoomId>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(
        room_service::get_room(&state, id, viewer.as_deref()).await?,
    ))
}

/// Join a room. Joining twice is a no-op.
#[utoipa::path(
    post,
    path = "/rooms/{id}/join",
    tag = "rooms",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Member of the room", body = RoomSnapshot),
        (status = 404, description = "Unknown room"),
        (status = 409, description = "Room is full")
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<RoomId>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(room_service::join_room(&state, id, &identity).await?))
}

/// Create the room's match.
#[utoipa::path(
    post,
    path = "/rooms/{id}/start",
    tag = "rooms",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Match created", body = RoomSnapshot),
        (status = 403, description = "Caller is not a member"),
        (status = 409, description = "Room not full or match already started")
    )
)]
pub async fn start_match(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<RoomId>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(
        room_service::start_match(&state, id, &identity).await?,
    ))
}

/// Change the team pairing before the match starts.
#[utoipa::path(
    put,
    path = "/rooms/{id}/teams",
    tag = "rooms",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = String, Header, description = "Authenticated username")
    ),
    request_body = RearrangeRequest,
    responses(
        (status = 200, description = "Pairing updated", body = RoomSnapshot),
        (status = 400, description = "Unknown scheme"),
        (status = 403, description = "Caller is not a member"),
        (status = 409, description = "Room not full or match already started")
    )
)]
pub async fn rearrange(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<RoomId>,
    Json(payload): Json<RearrangeRequest>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(
        room_service::rearrange(&state, id, &identity, &payload.scheme).await?,
    ))
}

/// Issue a short-lived ticket for the room's realtime channel.
#[utoipa::path(
    post,
    path = "/rooms/{id}/ticket",
    tag = "rooms",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("X-Username" = String, Header, description = "Authenticated username")
    ),
    responses(
        (status = 200, description = "Ticket issued", body = TicketResponse),
        (status = 403, description = "Caller is not a member")
    )
)]
pub async fn issue_ticket(
    State(state): State<SharedState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<RoomId>,
) -> Result<Json<TicketResponse>, AppError> {
    Ok(Json(
        ticket_service::issue_ticket(&state, id, &identity).await?,
    ))
}
