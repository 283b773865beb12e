//! Error types of the HTTP result sink.

use thiserror::Error;

use crate::dao::result_sink::SinkError;

/// Convenient result alias returning [`HttpSinkError`] failures.
pub type HttpSinkResult<T> = Result<T, HttpSinkError>;

/// Failures that can occur while talking to the result endpoint.
#[derive(Debug, Error)]
pub enum HttpSinkError {
    /// Required environment variable is missing.
    #[error("missing result sink environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build result sink client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The submission request could not be sent.
    #[error("failed to send result to `{endpoint}`")]
    RequestSend {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The response body could not be read.
    #[error("failed to read result response from `{endpoint}`")]
    ReadBody {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<HttpSinkError> for SinkError {
    fn from(err: HttpSinkError) -> Self {
        let message = match &err {
            HttpSinkError::RequestSend { source, .. } if source.is_timeout() => {
                "result storage did not answer in time".to_string()
            }
            HttpSinkError::RequestSend { .. } => "result storage unreachable".to_string(),
            other => other.to_string(),
        };
        SinkError::unavailable(message, err)
    }
}
