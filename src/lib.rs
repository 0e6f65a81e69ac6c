//! Library crate for wordrooms-back, exposing modules for binaries and tests.

/// Configuration file loading and match tunables.
pub mod config;
/// Persistence layer.
pub mod dao;
/// Wire types of the REST and realtime APIs.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum routers.
pub mod routes;
/// Operations orchestrating the domain core behind the room locks.
pub mod services;
/// Domain core and shared application state.
pub mod state;
