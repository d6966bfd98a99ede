use async_trait::async_trait;
use reqwest::header::{CONNECTION, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::carbon2::CARBON2_CONTENT_TYPE;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// One request/response exchange with the ingestion endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Errors are `SinkError::Request` when the request cannot be built and
    /// `SinkError::Transport` when it cannot be executed.
    async fn post(&self, endpoint: &str, payload: String) -> Result<TransportResponse>;
}

/// Posts Carbon2 payloads over HTTP. No timeout is applied.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &str, payload: String) -> Result<TransportResponse> {
        let request = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, CARBON2_CONTENT_TYPE)
            .header(CONNECTION, "close")
            .body(payload)
            .build()?;

        let response = self.client.execute(request).await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Failed to read response body: {}", e);
                String::new()
            }
        };

        Ok(TransportResponse { status, body })
    }
}
