use serde::Serialize;
use utoipa::ToSchema;

/// Body of `/healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` while finished matches cannot be stored.
    pub status: &'static str,
    /// Open scoreboards.
    pub sessions: usize,
    /// Connected SSE displays.
    pub listeners: usize,
}

impl HealthResponse {
    /// Result storage is configured.
    pub fn ok(sessions: usize, listeners: usize) -> Self {
        Self {
            status: "ok",
            sessions,
            listeners,
        }
    }

    /// No result storage: matches can be scored but not submitted.
    pub fn degraded(sessions: usize, listeners: usize) -> Self {
        Self {
            status: "degraded",
            sessions,
            listeners,
        }
    }
}
