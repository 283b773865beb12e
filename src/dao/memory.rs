use std::{collections::VecDeque, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::{
    dao::result_sink::{ResultSink, SinkResult, interpret_response},
    dto::result::ResultPayload,
};

const ACCEPTED_BODY: &str = r#"{"status":"ok"}"#;

/// Submissions kept for inspection; older ones are dropped first.
pub const MAX_RECEIVED: usize = 256;

#[derive(Default)]
struct Inner {
    received: VecDeque<ResultPayload>,
    scripted: VecDeque<(u16, String)>,
}

/// Result sink that keeps payloads in memory.
///
/// Answers are scripted as raw `(status, body)` pairs and go through the same
/// response interpretation as the HTTP sink; with no script left every
/// submission is accepted. Meant for tests and offline runs: only the last
/// [`MAX_RECEIVED`] payloads are kept.
#[derive(Clone, Default)]
pub struct MemoryResultSink {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryResultSink {
    /// Empty sink accepting everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the raw answer for the next submission.
    pub async fn push_response(&self, status: u16, body: impl Into<String>) {
        self.inner
            .lock()
            .await
            .scripted
            .push_back((status, body.into()));
    }

    /// Payloads submitted so far, accepted or not, oldest first.
    pub async fn received(&self) -> Vec<ResultPayload> {
        self.inner.lock().await.received.iter().cloned().collect()
    }
}

impl ResultSink for MemoryResultSink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn submit(&self, payload: ResultPayload) -> BoxFuture<'static, SinkResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.lock().await;
            if guard.received.len() == MAX_RECEIVED {
                guard.received.pop_front();
            }
            guard.received.push_back(payload);
            let (status, body) = guard
                .scripted
                .pop_front()
                .unwrap_or_else(|| (200, ACCEPTED_BODY.to_string()));
            interpret_response(status, body.as_bytes())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::result_sink::SinkError, dto::result::ResultParticipants, state::roster::MatchMode,
    };

    fn payload(score1: u32) -> ResultPayload {
        ResultPayload {
            game_type: MatchMode::Singles,
            score1,
            score2: 0,
            start_time: "2026-10-18T09:00:00Z".into(),
            end_time: "2026-10-18T09:10:00Z".into(),
            participants: ResultParticipants::Singles {
                player1: "Ana".into(),
                player2: "Bo".into(),
                winner: "Ana".into(),
            },
        }
    }

    #[tokio::test]
    async fn history_keeps_the_latest_submissions() {
        let sink = MemoryResultSink::new();
        let total = MAX_RECEIVED as u32 + 10;
        for score in 0..total {
            sink.submit(payload(score)).await.unwrap();
        }

        let received = sink.received().await;
        assert_eq!(received.len(), MAX_RECEIVED);
        assert_eq!(received[0].score1, 10);
        assert_eq!(received[MAX_RECEIVED - 1].score1, total - 1);
    }

    #[tokio::test]
    async fn scripted_answers_are_used_in_order() {
        let sink = MemoryResultSink::new();
        sink.push_response(500, r#"{"error":"db down"}"#).await;

        let err = sink.submit(payload(11)).await.unwrap_err();
        assert!(matches!(err, SinkError::Status { status: 500, .. }));
        assert_eq!(err.user_message(), "db down");

        sink.submit(payload(11)).await.unwrap();
        assert_eq!(sink.received().await.len(), 2);
    }
}
