use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use crate::{
    dao::result_sink::{ResultSink, SinkResult, interpret_response},
    dto::result::ResultPayload,
};

use super::{
    config::HttpSinkConfig,
    error::{HttpSinkError, HttpSinkResult},
};

/// Posts finished matches as JSON to the tournament application.
#[derive(Clone)]
pub struct HttpResultSink {
    client: Client,
    endpoint: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl HttpResultSink {
    /// Build the HTTP client for the configured endpoint.
    pub fn new(config: HttpSinkConfig) -> HttpSinkResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| HttpSinkError::ClientBuilder { source })?;

        let endpoint = Arc::<str>::from(config.endpoint);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        Ok(Self {
            client,
            endpoint,
            auth,
        })
    }

    /// Endpoint results are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, payload: &ResultPayload) -> HttpSinkResult<(u16, Vec<u8>)> {
        let mut builder = self.client.post(self.endpoint.as_ref()).json(payload);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
        }

        let response = builder
            .send()
            .await
            .map_err(|source| HttpSinkError::RequestSend {
                endpoint: self.endpoint.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| HttpSinkError::ReadBody {
                endpoint: self.endpoint.to_string(),
                source,
            })?;

        Ok((status, body.to_vec()))
    }
}

impl ResultSink for HttpResultSink {
    fn name(&self) -> &'static str {
        "http"
    }

    fn submit(&self, payload: ResultPayload) -> BoxFuture<'static, SinkResult<()>> {
        let sink = self.clone();
        Box::pin(async move {
            let (status, body) = sink.post(&payload).await?;
            debug!(endpoint = %sink.endpoint, status, "result storage answered");
            interpret_response(status, &body)
        })
    }
}
