use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the store and report whether it answered.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.game_store().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::game_store::memory::MemoryGameStore, services::tests::state_with_store};

    #[tokio::test]
    async fn reports_storage_outages() {
        let store = MemoryGameStore::new();
        let state = state_with_store(store.clone());
        assert_eq!(health_status(&state).await.status, "ok");

        store.set_offline(true);
        assert_eq!(health_status(&state).await.status, "degraded");
    }
}
