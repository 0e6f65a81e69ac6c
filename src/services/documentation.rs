use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the word rooms backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::rooms::list_rooms,
        crate::routes::rooms::create_room,
        crate::routes::rooms::get_room,
        crate::routes::rooms::join_room,
        crate::routes::rooms::start_match,
        crate::routes::rooms::rearrange,
        crate::routes::rooms::issue_ticket,
        crate::routes::game::play,
        crate::routes::game::correct,
        crate::routes::game::skip,
        crate::routes::words::add_words,
        crate::routes::words::delete_word,
        crate::routes::words::word_stats,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::RearrangeRequest,
            crate::dto::room::RoomSnapshot,
            crate::dto::room::MatchSnapshot,
            crate::dto::room::WordSnapshot,
            crate::dto::room::WordResponse,
            crate::dto::room::TicketResponse,
            crate::dto::words::AddWordsRequest,
            crate::dto::words::WordInput,
            crate::dto::words::WordSummary,
            crate::dto::words::WordStatsResponse,
            crate::dto::words::TierCount,
            crate::state::state_machine::MatchState,
            crate::state::room::TeamScheme,
            crate::state::words::Complexity,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rooms", description = "Room lifecycle and realtime tickets"),
        (name = "game", description = "Explainer actions during a match"),
        (name = "words", description = "Word catalog management"),
        (name = "realtime", description = "WebSocket room observers"),
    )
)]
pub struct ApiDoc;
