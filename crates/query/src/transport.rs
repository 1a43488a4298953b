//! The HTTP collaborator.
//!
//! A transport only has to POST a body and hand back status and body. Any
//! failure to obtain a response at all (connection refused, timeout, TLS)
//! is a [`TransportError`]; a response with a bad status is not.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Default total timeout for one request (25 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be built, e.g. a malformed URL or header.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Connection faults and timeouts may succeed on another attempt; a
    /// request that cannot be built never will.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Blocking POST.
pub trait Transport: Send + Sync {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Non-blocking POST.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] and [`AsyncTransport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn classify(error: &reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(timeout)
        } else if error.is_builder() {
            TransportError::InvalidRequest(error.to_string())
        } else {
            TransportError::Network(error.to_string())
        }
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        // The blocking client must not be created or dropped inside an
        // async runtime, so it is never stored on the transport.
        let client = reqwest::blocking::Client::builder()
            .timeout(request.timeout)
            .build()
            .map_err(|e| {
                TransportError::InvalidRequest(format!("Failed to create HTTP client: {e}"))
            })?;

        let mut builder = client
            .post(&request.url)
            .header("Content-Type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        tracing::debug!("Sending request");
        let response = builder
            .body(request.body.clone())
            .send()
            .map_err(|e| Self::classify(&e, request.timeout))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .text()
            .map_err(|e| Self::classify(&e, request.timeout))?;
        tracing::debug!(status, "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    async fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .header("Content-Type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        tracing::debug!("Sending request");
        let response = builder
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| Self::classify(&e, request.timeout))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(&e, request.timeout))?;
        tracing::debug!(status, "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_new() {
        let response = HttpResponse::new(400, "blahblah");
        assert_eq!(response.status, 400);
        assert_eq!(response.body, "blahblah");
        assert!(response.headers.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let request = HttpRequest {
            url: "http://127.0.0.1:1/graphql".to_string(),
            headers: HashMap::new(),
            body: "{}".to_string(),
            timeout: Duration::from_secs(5),
        };
        let result = AsyncTransport::post(&ReqwestTransport::new(), &request).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_malformed_url_is_invalid_request() {
        let request = HttpRequest {
            url: "not a url".to_string(),
            headers: HashMap::new(),
            body: "{}".to_string(),
            timeout: Duration::from_secs(5),
        };
        let err = AsyncTransport::post(&ReqwestTransport::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(TransportError::Network("reset".to_string()).is_retryable());
        assert!(TransportError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!TransportError::InvalidRequest("bad header".to_string()).is_retryable());
    }
}
