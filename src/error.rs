use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::result_sink::SinkError,
    state::{engine::InvalidSide, session::SessionError},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No result sink is installed.
    #[error("result storage unavailable (degraded mode)")]
    Degraded,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// The result storage refused or could not take the result.
    #[error("result submission failed: {message}")]
    Submission {
        /// Operator-facing message.
        message: String,
        #[source]
        source: SinkError,
    },
}

impl From<SinkError> for ServiceError {
    fn from(err: SinkError) -> Self {
        ServiceError::Submission {
            message: err.user_message(),
            source: err,
        }
    }
}

impl From<InvalidSide> for ServiceError {
    fn from(err: InvalidSide) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Roster(roster) => ServiceError::InvalidInput(roster.to_string()),
            SessionError::InvalidTransition(invalid) => {
                ServiceError::InvalidState(invalid.to_string())
            }
            SessionError::SubmissionInFlight => {
                ServiceError::InvalidState("result submission already in flight".into())
            }
            SessionError::AlreadySubmitted => {
                ServiceError::InvalidState("result already submitted".into())
            }
            SessionError::TicketMismatch { .. } => {
                ServiceError::InvalidState("session changed while the result was submitted".into())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The upstream result storage failed.
    #[error("{0}")]
    BadGateway(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Degraded => {
                AppError::ServiceUnavailable("result storage unavailable (degraded mode)".into())
            }
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Submission { message, .. } => AppError::BadGateway(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

