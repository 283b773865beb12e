use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        session::ScoreboardView,
        sse::{ResultFailedEvent, ServerEvent, SessionDeletedEvent},
    },
    state::SharedState,
};

const EVENT_SESSION_CREATED: &str = "session.created";
const EVENT_MATCH_STARTED: &str = "match.started";
const EVENT_SCORE_UPDATED: &str = "score.updated";
const EVENT_MATCH_FINISHED: &str = "match.finished";
const EVENT_RESULT_SUBMITTED: &str = "result.submitted";
const EVENT_RESULT_FAILED: &str = "result.failed";
const EVENT_SESSION_RESET: &str = "session.reset";
const EVENT_SESSION_DELETED: &str = "session.deleted";

/// Broadcast that a new scoreboard was opened.
pub fn broadcast_session_created(state: &SharedState, board: &ScoreboardView) {
    send_public_event(state, EVENT_SESSION_CREATED, board);
}

/// Broadcast that a match left setup.
pub fn broadcast_match_started(state: &SharedState, board: &ScoreboardView) {
    send_public_event(state, EVENT_MATCH_STARTED, board);
}

/// Broadcast the scoreboard after an applied point event.
pub fn broadcast_score_updated(state: &SharedState, board: &ScoreboardView) {
    send_public_event(state, EVENT_SCORE_UPDATED, board);
}

/// Broadcast the final scoreboard of a decided match.
pub fn broadcast_match_finished(state: &SharedState, board: &ScoreboardView) {
    send_public_event(state, EVENT_MATCH_FINISHED, board);
}

/// Broadcast that storage accepted a result.
pub fn broadcast_result_submitted(state: &SharedState, board: &ScoreboardView) {
    send_public_event(state, EVENT_RESULT_SUBMITTED, board);
}

/// Broadcast that a submission attempt failed.
pub fn broadcast_result_failed(state: &SharedState, session_id: Uuid, error: &str) {
    let payload = ResultFailedEvent {
        session_id,
        error: error.to_string(),
    };
    send_public_event(state, EVENT_RESULT_FAILED, &payload);
}

/// Broadcast that a session went back to setup.
pub fn broadcast_session_reset(state: &SharedState, board: &ScoreboardView) {
    send_public_event(state, EVENT_SESSION_RESET, board);
}

/// Broadcast that a session was dropped.
pub fn broadcast_session_deleted(state: &SharedState, session_id: Uuid) {
    let payload = SessionDeletedEvent { session_id };
    send_public_event(state, EVENT_SESSION_DELETED, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
