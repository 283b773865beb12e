use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::session::{
        CreateSessionRequest, PointRequest, PointResponse, ScoreboardView, SessionListItem,
        StartMatchRequest,
    },
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Scoreboard endpoints: session lifecycle, point events and result submission.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/{id}",
            get(get_scoreboard).delete(delete_session),
        )
        .route("/sessions/{id}/start", post(start_match))
        .route("/sessions/{id}/points/add", post(add_point))
        .route("/sessions/{id}/points/remove", post(remove_point))
        .route("/sessions/{id}/submit", post(submit_result))
        .route("/sessions/{id}/reset", post(reset_session))
}

/// List every open scoreboard.
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "sessions",
    responses((status = 200, description = "Open scoreboards", body = [SessionListItem]))
)]
pub async fn list_sessions(State(state): State<SharedState>) -> Json<Vec<SessionListItem>> {
    Json(session_service::list_sessions(&state).await)
}

/// Open a new scoreboard in setup.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = ScoreboardView),
        (status = 409, description = "Session limit reached")
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ScoreboardView>), AppError> {
    let view = session_service::create_session(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Current scoreboard of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Current scoreboard", body = ScoreboardView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_scoreboard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreboardView>, AppError> {
    Ok(Json(session_service::get_scoreboard(&state, id).await?))
}

/// Drop a session whatever its phase.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session_service::delete_session(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Select the participants and start play at 0-0.
#[utoipa::path(
    post,
    path = "/sessions/{id}/start",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    request_body = StartMatchRequest,
    responses(
        (status = 200, description = "Match started", body = ScoreboardView),
        (status = 400, description = "Invalid participant selection"),
        (status = 409, description = "Session is not in setup")
    )
)]
pub async fn start_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<StartMatchRequest>>,
) -> Result<Json<ScoreboardView>, AppError> {
    Ok(Json(session_service::start_match(&state, id, payload).await?))
}

/// Record a point for a side.
#[utoipa::path(
    post,
    path = "/sessions/{id}/points/add",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    request_body = PointRequest,
    responses(
        (status = 200, description = "Point processed; `applied` is false once the match is decided", body = PointResponse),
        (status = 409, description = "Match not started")
    )
)]
pub async fn add_point(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<PointRequest>>,
) -> Result<Json<PointResponse>, AppError> {
    Ok(Json(
        session_service::add_point(&state, id, payload.side).await?,
    ))
}

/// Take a point back from a side.
#[utoipa::path(
    post,
    path = "/sessions/{id}/points/remove",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    request_body = PointRequest,
    responses(
        (status = 200, description = "Point processed; `applied` is false at zero or once decided", body = PointResponse),
        (status = 409, description = "Match not started")
    )
)]
pub async fn remove_point(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<PointRequest>>,
) -> Result<Json<PointResponse>, AppError> {
    Ok(Json(
        session_service::remove_point(&state, id, payload.side).await?,
    ))
}

/// Send the finished match to result storage.
#[utoipa::path(
    post,
    path = "/sessions/{id}/submit",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Result accepted by storage", body = ScoreboardView),
        (status = 409, description = "Match not finished, already submitted or submission in flight"),
        (status = 502, description = "Storage refused or could not be reached; submit again to retry"),
        (status = 503, description = "No result storage configured")
    )
)]
pub async fn submit_result(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreboardView>, AppError> {
    Ok(Json(session_service::submit_result(&state, id).await?))
}

/// Abandon the current match and return to setup.
#[utoipa::path(
    post,
    path = "/sessions/{id}/reset",
    tag = "sessions",
    params(("id" = String, Path, description = "Session identifier")),
    responses((status = 200, description = "Session back in setup", body = ScoreboardView))
)]
pub async fn reset_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreboardView>, AppError> {
    Ok(Json(session_service::reset_session(&state, id).await?))
}
