use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report `degraded` while no result sink is installed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let sessions = state.sessions().len();
    let listeners = state.public_sse().subscriber_count();

    if state.is_degraded().await {
        warn!(sessions, "result sink unavailable (degraded mode)");
        HealthResponse::degraded(sessions, listeners)
    } else {
        HealthResponse::ok(sessions, listeners)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::memory::MemoryResultSink, state::AppState};

    #[tokio::test]
    async fn degraded_until_a_sink_is_installed() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await.status, "degraded");

        state
            .install_result_sink(Arc::new(MemoryResultSink::new()))
            .await;
        let health = health_status(&state).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.sessions, 0);
    }
}
