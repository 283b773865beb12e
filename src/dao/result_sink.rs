use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::dto::result::{ResultPayload, SubmitResponse};

/// Status value the storage uses to accept a result.
const STATUS_OK: &str = "ok";

/// Result alias for result delivery.
pub type SinkResult<T> = Result<T, SinkError>;

/// Error raised by result sinks regardless of the transport.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The storage answered but refused the result.
    #[error("result rejected: {message}")]
    Rejected {
        /// Reason given by the storage.
        message: String,
    },
    /// The storage answered with a non-success HTTP status.
    #[error("unexpected storage response status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message found in the body, if any.
        message: Option<String>,
    },
    /// The storage answer could not be understood.
    #[error("malformed storage response: {reason}")]
    Decode {
        /// What was wrong with the body.
        reason: String,
    },
    /// The storage could not be reached.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Short description of the failure.
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl SinkError {
    /// Construct an unavailable error from any transport failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        SinkError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Text shown to the operator: the storage's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            SinkError::Rejected { message } => message.clone(),
            SinkError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Destination for finished match results.
pub trait ResultSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Deliver one result. Called once per operator request, never retried here.
    fn submit(&self, payload: ResultPayload) -> BoxFuture<'static, SinkResult<()>>;
}

/// Decide whether a storage answer accepted the result.
///
/// Only a 2xx status whose body reads `{"status": "ok"}` counts as success.
pub fn interpret_response(status: u16, body: &[u8]) -> SinkResult<()> {
    let parsed = serde_json::from_slice::<SubmitResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed.ok().and_then(|response| response.error);
        return Err(SinkError::Status { status, message });
    }

    let response = parsed.map_err(|err| SinkError::Decode {
        reason: err.to_string(),
    })?;

    match response.status.as_deref() {
        Some(STATUS_OK) => Ok(()),
        Some(other) => Err(SinkError::Rejected {
            message: response
                .error
                .unwrap_or_else(|| format!("storage answered status `{other}`")),
        }),
        None => Err(SinkError::Decode {
            reason: "response carries no status".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_status_is_accepted() {
        assert!(interpret_response(200, br#"{"status": "ok"}"#).is_ok());
        assert!(interpret_response(201, br#"{"status": "ok", "id": 4}"#).is_ok());
    }

    #[test]
    fn application_rejection_surfaces_server_message() {
        let err = interpret_response(200, br#"{"status": "error", "error": "duplicate"}"#)
            .unwrap_err();
        assert!(matches!(err, SinkError::Rejected { .. }));
        assert_eq!(err.user_message(), "duplicate");

        let err = interpret_response(200, br#"{"status": "error"}"#).unwrap_err();
        assert_eq!(err.user_message(), "storage answered status `error`");
    }

    #[test]
    fn http_failure_is_a_failure_even_with_ok_body() {
        let err = interpret_response(500, br#"{"status": "ok"}"#).unwrap_err();
        assert!(matches!(
            err,
            SinkError::Status {
                status: 500,
                message: None
            }
        ));

        let err = interpret_response(405, br#"{"error": "Invalid method"}"#).unwrap_err();
        assert_eq!(err.user_message(), "Invalid method");
    }

    #[test]
    fn malformed_bodies_are_failures() {
        assert!(matches!(
            interpret_response(200, b"<html>oops</html>"),
            Err(SinkError::Decode { .. })
        ));
        assert!(matches!(
            interpret_response(200, b"{}"),
            Err(SinkError::Decode { .. })
        ));
        assert!(matches!(
            interpret_response(502, b""),
            Err(SinkError::Status { status: 502, .. })
        ));
    }
}
