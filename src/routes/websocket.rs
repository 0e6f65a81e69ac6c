use axum::{
    Router,
    extract::{Path, Query, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};

use crate::{
    dto::room::TicketQuery,
    services::websocket_service,
    state::{SharedState, room::RoomId},
};

#[utoipa::path(
    get,
    path = "/ws/rooms/{id}",
    tag = "realtime",
    params(
        ("id" = String, Path, description = "Identifier of the room"),
        ("ticket" = Option<String>, Query, description = "Ticket issued by POST /rooms/{id}/ticket")
    ),
    responses((status = 101, description = "Switching protocols to WebSocket; refused tickets are closed with code 1008"))
)]
/// Upgrade the HTTP connection into a room observer session.
pub async fn ws_handler(
    State(state): State<SharedState>,
    Path(id): Path<RoomId>,
    Query(query): Query<TicketQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| websocket_service::handle_socket(state, socket, id, query.ticket))
}

/// Configure the WebSocket endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/ws/rooms/{id}", get(ws_handler))
}
