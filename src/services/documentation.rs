use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sessions::list_sessions,
        crate::routes::sessions::create_session,
        crate::routes::sessions::get_scoreboard,
        crate::routes::sessions::delete_session,
        crate::routes::sessions::start_match,
        crate::routes::sessions::add_point,
        crate::routes::sessions::remove_point,
        crate::routes::sessions::submit_result,
        crate::routes::sessions::reset_session,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::CreateSessionRequest,
            crate::dto::session::StartMatchRequest,
            crate::dto::session::PointRequest,
            crate::dto::session::PointResponse,
            crate::dto::session::ScoreboardView,
            crate::dto::session::SessionListItem,
            crate::dto::session::VisiblePhase,
            crate::dto::session::VisibleSubmission,
            crate::dto::session::PointView,
            crate::dto::result::ResultPayload,
            crate::dto::sse::ResultFailedEvent,
            crate::dto::sse::SessionDeletedEvent,
            crate::state::roster::MatchMode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "sessions", description = "Scoreboard lifecycle, scoring and result submission"),
    )
)]
pub struct ApiDoc;
