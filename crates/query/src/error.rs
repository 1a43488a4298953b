use crate::config::ConfigError;
use crate::transport::{HttpResponse, TransportError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("values() requires at least one selection")]
    ValuesRequiresArguments,

    #[error("Cannot serialize {0} as a GraphQL value")]
    UnserializableType(String),

    #[error("GraphQL doesn't support non-finite floats (got {0})")]
    InfinityNotSupported(f64),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The endpoint answered with a status other than 200.
    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    Endpoint {
        status: u16,
        body: String,
        response: HttpResponse,
    },

    /// The endpoint answered 200 with a non-null `errors` member.
    #[error("GraphQL endpoint responded with errors: {response}")]
    GraphQL { response: serde_json::Value },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Middleware error: {0}")]
    Middleware(String),

    #[error("Response has no key '{0}'")]
    MissingKey(String),

    #[error("Query is not bound to a client")]
    Unbound,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns true for faults raised by the transport itself, before any
    /// response was received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status of an endpoint error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Endpoint { status, .. } => Some(*status),
            _ => None,
        }
    }
}
