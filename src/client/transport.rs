//! The HTTP execution boundary.

use crate::client::error::RedditClientError;
use crate::client::request::ApiRequest;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest::Client;

/// Status, headers and body of a completed HTTP exchange.
///
/// When the headers arrived but reading the body failed, `body` is `None`
/// and `body_error` holds the failure, so the headers still reach the
/// rate-limit tracker.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub body_error: Option<String>,
}

/// Executes a fully formed request exactly once.
///
/// Implementations must be shareable across tasks; the session hands the
/// same transport to every in-flight call. Errors returned here are
/// transport-level failures with no response attached.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, RedditClientError>;
}

/// Transport backed by a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self, RedditClientError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| RedditClientError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, RedditClientError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RedditClientError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        debug!("Response status: {}", status);

        let (body, body_error) = match response.bytes().await {
            Ok(bytes) => {
                debug!("Response body length: {} bytes", bytes.len());
                let body = if bytes.is_empty() {
                    None
                } else {
                    Some(bytes.to_vec())
                };
                (body, None)
            }
            Err(e) => {
                warn!("Failed to read response body: {}", e);
                (None, Some(e.to_string()))
            }
        };

        Ok(RawResponse {
            status,
            headers,
            body,
            body_error,
        })
    }
}
