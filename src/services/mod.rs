/// Snapshot views and publishing.
pub mod broadcast;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Explainer actions during a match.
pub mod match_service;
/// Room lifecycle, persistence write-through and restore.
pub mod room_service;
/// Round end timers.
pub mod round_scheduler;
/// Ticket issuance and realtime admission.
pub mod ticket_service;
/// WebSocket connection handling for room observers.
pub mod websocket_service;
/// Word catalog management.
pub mod word_service;
