//! Scripted transport for exercising the client without a network.
//!
//! ## Usage
//!
//! ```ignore
//! use graphql_test_utils::{Outcome, StubTransport};
//!
//! let stub = Arc::new(StubTransport::new([
//!     Outcome::network("connection reset"),
//!     Outcome::respond(200, r#"{"data": {"a": 1}}"#),
//! ]));
//! let client = Client::new("http://example.com").with_transport(stub.clone());
//!
//! // ... fetch ...
//! assert_eq!(stub.request_count(), 2);
//! ```

use async_trait::async_trait;
use graphql_query::{AsyncTransport, HttpRequest, HttpResponse, Transport, TransportError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the stub does for one request.
#[derive(Debug, Clone)]
pub enum Outcome {
    Respond(HttpResponse),
    Fail(TransportError),
}

impl Outcome {
    #[must_use]
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::Respond(HttpResponse::new(status, body))
    }

    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::respond(status, body.to_string())
    }

    #[must_use]
    pub fn network(message: &str) -> Self {
        Self::Fail(TransportError::Network(message.to_string()))
    }

    #[must_use]
    pub fn invalid_request(message: &str) -> Self {
        Self::Fail(TransportError::InvalidRequest(message.to_string()))
    }
}

#[derive(Default)]
struct Log {
    script: VecDeque<Outcome>,
    requests: Vec<HttpRequest>,
}

impl Log {
    /// Pops the next outcome; the final one repeats forever.
    fn next(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.push(request.clone());
        let outcome = if self.script.len() > 1 {
            self.script.pop_front()
        } else {
            self.script.front().cloned()
        };
        match outcome {
            Some(Outcome::Respond(response)) => Ok(response),
            Some(Outcome::Fail(error)) => Err(error),
            None => Err(TransportError::Network(
                "stub transport has no scripted outcome".to_string(),
            )),
        }
    }
}

/// A [`Transport`] and [`AsyncTransport`] that replays scripted outcomes
/// and records every request it receives.
///
/// Sync and async calls share one script and one request log.
#[derive(Default)]
pub struct StubTransport {
    log: Mutex<Log>,
}

impl StubTransport {
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            log: Mutex::new(Log {
                script: outcomes.into_iter().collect(),
                requests: Vec::new(),
            }),
        }
    }

    /// A stub that always answers with `status` and `body`.
    #[must_use]
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self::new([Outcome::respond(status, body)])
    }

    fn with_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Log) -> R,
    {
        f(&mut self.log.lock().expect("StubTransport mutex poisoned"))
    }

    /// All requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.with_log(|log| log.requests.clone())
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.with_log(|log| log.requests.len())
    }

    /// The JSON body of the most recent request.
    #[must_use]
    pub fn last_body(&self) -> Option<serde_json::Value> {
        self.with_log(|log| {
            log.requests
                .last()
                .and_then(|request| serde_json::from_str(&request.body).ok())
        })
    }
}

impl Transport for StubTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.with_log(|log| log.next(request))
    }
}

#[async_trait]
impl AsyncTransport for StubTransport {
    async fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.with_log(|log| log.next(request))
    }
}
