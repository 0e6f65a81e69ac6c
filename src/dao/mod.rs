/// Room and word catalog storage.
pub mod game_store;
/// Persisted model definitions.
pub mod models;
/// Storage error types shared by every backend.
pub mod storage;
