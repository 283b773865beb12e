use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        result::ResultPayload,
        session::{
            CreateSessionRequest, PointResponse, ScoreboardView, SessionListItem,
            StartMatchRequest,
        },
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SessionHandle, SharedState,
        engine::Side,
        session::{MatchSession, PointOutcome, SessionError, SubmissionStatus, TicketId},
    },
};

/// Failure recorded when a submission is dropped before storage answered.
const SUBMISSION_INTERRUPTED: &str = "submission interrupted before storage answered";

/// Open a new scoreboard in setup.
pub async fn create_session(
    state: &SharedState,
    request: CreateSessionRequest,
) -> Result<ScoreboardView, ServiceError> {
    let session = MatchSession::new(request.mode);
    let id = session.id();
    let view = ScoreboardView::from(session.scoreboard());
    state.insert_session(session)?;

    info!(session_id = %id, mode = %request.mode, "session created");
    sse_events::broadcast_session_created(state, &view);
    Ok(view)
}

/// Summaries of every open scoreboard.
pub async fn list_sessions(state: &SharedState) -> Vec<SessionListItem> {
    let handles: Vec<_> = state
        .sessions()
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    let mut items = Vec::with_capacity(handles.len());
    for handle in handles {
        let session = handle.lock().await;
        items.push(SessionListItem::from(&session.scoreboard()));
    }
    items.sort_by_key(|item| item.session_id);
    items
}

/// Current scoreboard of a session.
pub async fn get_scoreboard(
    state: &SharedState,
    id: Uuid,
) -> Result<ScoreboardView, ServiceError> {
    let handle = state.session(id)?;
    let session = handle.lock().await;
    Ok(session.scoreboard().into())
}

/// Drop a session whatever its phase. An unsubmitted result is lost.
pub async fn delete_session(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let Some(handle) = state.remove_session(id) else {
        return Err(ServiceError::NotFound(format!("session `{id}` not found")));
    };

    let session = handle.lock().await;
    if session.result().is_some() && session.submission() != &SubmissionStatus::Accepted {
        warn!(session_id = %id, "session deleted with an unsubmitted result");
    }
    drop(session);

    info!(session_id = %id, "session deleted");
    sse_events::broadcast_session_deleted(state, id);
    Ok(())
}

/// Leave setup with the selected participants.
pub async fn start_match(
    state: &SharedState,
    id: Uuid,
    request: StartMatchRequest,
) -> Result<ScoreboardView, ServiceError> {
    let handle = state.session(id)?;
    let view: ScoreboardView = {
        let mut session = handle.lock().await;
        session.start(request.players)?.into()
    };

    info!(session_id = %id, mode = %view.mode, "match started");
    sse_events::broadcast_match_started(state, &view);
    Ok(view)
}

/// Record a point for side `side` (1 or 2).
pub async fn add_point(
    state: &SharedState,
    id: Uuid,
    side: u8,
) -> Result<PointResponse, ServiceError> {
    let side = Side::try_from(side)?;
    apply_point(state, id, side, PointKind::Add).await
}

/// Take a point back from side `side` (1 or 2).
pub async fn remove_point(
    state: &SharedState,
    id: Uuid,
    side: u8,
) -> Result<PointResponse, ServiceError> {
    let side = Side::try_from(side)?;
    apply_point(state, id, side, PointKind::Remove).await
}

#[derive(Clone, Copy, Debug)]
enum PointKind {
    Add,
    Remove,
}

async fn apply_point(
    state: &SharedState,
    id: Uuid,
    side: Side,
    kind: PointKind,
) -> Result<PointResponse, ServiceError> {
    let handle = state.session(id)?;
    let (outcome, view) = {
        let mut session = handle.lock().await;
        let outcome = match kind {
            PointKind::Add => session.add_point(side)?,
            PointKind::Remove => session.remove_point(side)?,
        };
        (outcome, ScoreboardView::from(session.scoreboard()))
    };

    match outcome {
        PointOutcome::Ignored(reason) => {
            debug!(session_id = %id, %side, ?kind, ?reason, "point event ignored");
        }
        PointOutcome::Applied => {
            debug!(
                session_id = %id,
                %side,
                ?kind,
                score1 = view.score1,
                score2 = view.score2,
                "point applied"
            );
            sse_events::broadcast_score_updated(state, &view);
        }
        PointOutcome::Decided(winner) => {
            info!(
                session_id = %id,
                %winner,
                score1 = view.score1,
                score2 = view.score2,
                "match finished"
            );
            sse_events::broadcast_score_updated(state, &view);
            sse_events::broadcast_match_finished(state, &view);
        }
    }

    Ok(PointResponse::new(outcome, view))
}

/// Deliver the frozen result of a finished match to the result sink.
///
/// At most one attempt is in flight per session. A refused or failed
/// delivery leaves the session finished so the operator can try again.
pub async fn submit_result(
    state: &SharedState,
    id: Uuid,
) -> Result<ScoreboardView, ServiceError> {
    let handle = state.session(id)?;
    let sink = state.require_result_sink().await?;

    let ticket = {
        let mut session = handle.lock().await;
        session.begin_submission()?
    };
    let guard = InFlightGuard {
        state: state.clone(),
        handle: handle.clone(),
        session_id: id,
        ticket: ticket.id,
        armed: true,
    };

    let payload = ResultPayload::from(&ticket.result);
    info!(
        session_id = %id,
        sink = sink.name(),
        ticket = %ticket.id,
        "submitting match result"
    );
    let outcome = sink.submit(payload).await;

    let (recorded, view) = {
        let mut session = handle.lock().await;
        let delivery = outcome
            .as_ref()
            .map(|_| ())
            .map_err(|err| err.user_message());
        let recorded = session.complete_submission(ticket.id, delivery).map(|_| ());
        guard.disarm();
        (recorded, ScoreboardView::from(session.scoreboard()))
    };

    if let Err(err) = recorded {
        // the session was reset while the request was out
        if let SessionError::TicketMismatch { .. } = err {
            warn!(
                session_id = %id,
                ticket = %ticket.id,
                ?outcome,
                "discarding stale submission answer"
            );
        }
        return Err(err.into());
    }

    match outcome {
        Ok(()) => {
            info!(session_id = %id, "match result accepted");
            sse_events::broadcast_result_submitted(state, &view);
            Ok(view)
        }
        Err(err) => {
            warn!(session_id = %id, error = %err, "match result submission failed");
            let error: ServiceError = err.into();
            if let ServiceError::Submission { message, .. } = &error {
                sse_events::broadcast_result_failed(state, id, message);
            }
            Err(error)
        }
    }
}

/// Marks an in-flight submission as failed if the request driving it is
/// dropped before the storage answer was recorded, so the operator can retry.
struct InFlightGuard {
    state: SharedState,
    handle: SessionHandle,
    session_id: Uuid,
    ticket: TicketId,
    armed: bool,
}

impl InFlightGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        warn!(
            session_id = %self.session_id,
            ticket = %self.ticket,
            "submission dropped before storage answered"
        );

        if let Ok(mut session) = self.handle.try_lock() {
            release_interrupted(&self.state, &mut session, self.session_id, self.ticket);
            return;
        }

        // the session is busy; finish the release once it is free
        let state = self.state.clone();
        let handle = self.handle.clone();
        let (session_id, ticket) = (self.session_id, self.ticket);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    let mut session = handle.lock().await;
                    release_interrupted(&state, &mut session, session_id, ticket);
                });
            }
            Err(_) => warn!(%session_id, "no runtime left to release the submission"),
        }
    }
}

fn release_interrupted(
    state: &SharedState,
    session: &mut MatchSession,
    session_id: Uuid,
    ticket: TicketId,
) {
    if session
        .complete_submission(ticket, Err(SUBMISSION_INTERRUPTED.to_string()))
        .is_ok()
    {
        sse_events::broadcast_result_failed(state, session_id, SUBMISSION_INTERRUPTED);
    }
}

/// Abandon the current match and return the session to setup.
pub async fn reset_session(
    state: &SharedState,
    id: Uuid,
) -> Result<ScoreboardView, ServiceError> {
    let handle = state.session(id)?;
    let view: ScoreboardView = {
        let mut session = handle.lock().await;
        session.reset().into()
    };

    info!(session_id = %id, "session reset");
    sse_events::broadcast_session_reset(state, &view);
    Ok(view)
}
