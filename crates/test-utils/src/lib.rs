//! Shared test utilities for graphql-query.
//!
//! - [`StubTransport`]: scripted transport that records every request
//! - [`assertions`]: document validity checks backed by `apollo-parser`

pub mod assertions;
mod transport;

pub use transport::{Outcome, StubTransport};

/// Install a test-friendly tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `off`. Safe to call from
/// every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_test_writer()
        .try_init();
}
