//! Configurable GraphQL client.
//!
//! The client owns the endpoint, headers, transports and the middleware
//! pipeline. Documents built from [`Client::query`] or [`Client::mutation`]
//! carry the client with them, so `fetch` can be called on any node.

use crate::config::ClientConfig;
use crate::middleware::Middleware;
use crate::transport::{
    AsyncTransport, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
    DEFAULT_TIMEOUT,
};
use crate::{Error, Query, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Operation variables sent alongside the document.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// Default number of attempts for async requests.
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default delay between async attempts (2 seconds).
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Indentation used for documents sent over the wire.
const WIRE_INDENTATION: usize = 2;

/// Bounded fixed-delay retry applied to the async transport call.
///
/// Only retryable transport faults (connection errors and timeouts) are
/// retried. A received response, whatever its status or payload, ends the
/// loop, as does a request that cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// A GraphQL endpoint plus everything needed to talk to it.
///
/// # Examples
///
/// ```no_run
/// use graphql_query::{AutoSubscript, Client};
/// use std::sync::Arc;
///
/// let client = Client::new("https://api.github.com/graphql")
///     .with_header("Authorization", "Bearer my-token")
///     .with_middleware(Arc::new(AutoSubscript));
///
/// let query = client.query();
/// query
///     .field("repository")
///     .args([("owner", "juliuscaeser"), ("name", "rome")])
///     .values(["title", "url"])?;
///
/// let repository = query.fetch(None)?;
/// println!("{}", repository["title"]);
/// # Ok::<(), graphql_query::Error>(())
/// ```
#[derive(Clone)]
pub struct Client {
    url: String,
    headers: HashMap<String, String>,
    middleware: Vec<Arc<dyn Middleware>>,
    timeout: Duration,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
    async_transport: Arc<dyn AsyncTransport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("middleware", &self.middleware.len())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for `url` with default settings.
    ///
    /// Default settings:
    /// - 25 second request timeout
    /// - 3 async attempts, 2 seconds apart
    /// - No custom headers
    /// - Empty middleware pipeline
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let transport = Arc::new(ReqwestTransport::new());
        Self {
            url: url.into(),
            headers: HashMap::new(),
            middleware: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            transport: transport.clone(),
            async_transport: transport,
        }
    }

    /// Creates a client from a loaded [`ClientConfig`].
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.url.clone())
            .with_headers(config.headers.clone())
            .with_timeout(Duration::from_secs(config.timeout))
            .with_retry(RetryPolicy {
                attempts: config.retry.attempts,
                delay: Duration::from_secs(config.retry.delay),
            })
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Appends a transform to the end of the pipeline.
    #[must_use]
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces both transports with one implementation.
    #[must_use]
    pub fn with_transport<T>(mut self, transport: Arc<T>) -> Self
    where
        T: Transport + AsyncTransport + 'static,
    {
        self.transport = transport.clone();
        self.async_transport = transport;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Starts a `query` document bound to this client.
    #[must_use]
    pub fn query(&self) -> Query {
        Query::bound("query", self.clone())
    }

    /// Starts a `mutation` document bound to this client.
    #[must_use]
    pub fn mutation(&self) -> Query {
        Query::bound("mutation", self.clone())
    }

    /// Runs `data` through the middleware pipeline, left to right.
    pub fn pre_response(&self, data: serde_json::Value, root: &Query) -> Result<serde_json::Value> {
        self.middleware
            .iter()
            .try_fold(data, |data, middleware| middleware.pre_response(data, root))
    }

    /// Renders `root`, sends it and returns the data after middleware.
    #[tracing::instrument(skip(self, root, variables), fields(url = %self.url))]
    pub fn fetch(&self, root: &Query, variables: Option<&Variables>) -> Result<serde_json::Value> {
        let document = root.to_graphql(WIRE_INDENTATION)?;
        let data = self.execute(&document, variables)?;
        self.pre_response(data, root)
    }

    /// Async variant of [`Client::fetch`].
    #[tracing::instrument(skip(self, root, variables), fields(url = %self.url))]
    pub async fn fetch_async(
        &self,
        root: &Query,
        variables: Option<&Variables>,
    ) -> Result<serde_json::Value> {
        let document = root.to_graphql(WIRE_INDENTATION)?;
        let data = self.execute_async(&document, variables).await?;
        self.pre_response(data, root)
    }

    /// Sends a rendered document once and returns the `data` member.
    ///
    /// No middleware is applied and transport faults are not retried.
    pub fn execute(&self, document: &str, variables: Option<&Variables>) -> Result<serde_json::Value> {
        let request = self.request(document, variables)?;
        tracing::debug!("Sending document");
        let response = self.transport.post(&request)?;
        Self::handle_response(response)
    }

    /// Sends a rendered document over the async transport and returns the
    /// `data` member. Transport faults are retried per the [`RetryPolicy`].
    pub async fn execute_async(
        &self,
        document: &str,
        variables: Option<&Variables>,
    ) -> Result<serde_json::Value> {
        let request = self.request(document, variables)?;
        let response = self.post_with_retry(&request).await?;
        Self::handle_response(response)
    }

    async fn post_with_retry(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut last_error = None;
        let attempts = self.retry.attempts.max(1);

        for attempt in 0..attempts {
            if attempt > 0 {
                tracing::info!(
                    attempt,
                    delay_ms = self.retry.delay.as_millis() as u64,
                    "Retrying after delay"
                );
                tokio::time::sleep(self.retry.delay).await;
            }

            match self.async_transport.post(request).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() => {
                    tracing::warn!(attempt, error = %e, "Request failed, not retrying");
                    return Err(e.into());
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Request failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| TransportError::Network("No attempts made".to_string()))
            .into())
    }

    fn request(&self, document: &str, variables: Option<&Variables>) -> Result<HttpRequest> {
        let mut body = serde_json::Map::new();
        body.insert("query".to_string(), document.into());
        if let Some(variables) = variables.filter(|v| !v.is_empty()) {
            body.insert(
                "variables".to_string(),
                serde_json::Value::Object(variables.clone()),
            );
        }
        let body = serde_json::to_string(&body)
            .map_err(|e| Error::Parse(format!("Failed to encode request: {e}")))?;

        Ok(HttpRequest {
            url: self.url.clone(),
            headers: self.headers.clone(),
            body,
            timeout: self.timeout,
        })
    }

    /// Maps a received response onto data or an error.
    fn handle_response(response: HttpResponse) -> Result<serde_json::Value> {
        let status = response.status;
        tracing::debug!(status, "Received response");

        if status != 200 {
            tracing::error!(status, body = %response.body, "HTTP error response");
            return Err(Error::Endpoint {
                status,
                body: response.body.clone(),
                response,
            });
        }

        let envelope: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse response");
            Error::Parse(e.to_string())
        })?;
        let serde_json::Value::Object(mut envelope) = envelope else {
            return Err(Error::Parse("expected a JSON object".to_string()));
        };

        if envelope.get("errors").is_some_and(|errors| !errors.is_null()) {
            tracing::warn!("GraphQL errors in response");
            return Err(Error::GraphQL {
                response: serde_json::Value::Object(envelope),
            });
        }

        Ok(envelope
            .remove("data")
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())))
    }
}
