//! Fluent GraphQL document builder with a small HTTP client.
//!
//! Documents are built as a tree of [`Query`] nodes: [`Query::field`] adds
//! a nested operation and returns it, [`Query::args`] attaches arguments
//! and [`Query::values`] lists the fields to select. The tree renders to
//! GraphQL text, either on one line or indented.
//!
//! A [`Client`] sends rendered documents over HTTP, maps the response onto
//! data or an [`Error`], and runs the data through its [`Middleware`].
//!
//! # Examples
//!
//! ## Building a document
//!
//! ```
//! use graphql_query::{Aliased, Literal, Query, Selection};
//!
//! let query = Query::new();
//! query
//!     .field("repository")
//!     .args([("owner", "juliuscaeser"), ("name", "rome")])
//!     .field("issues")
//!     .args([("orderBy", Literal::new("CREATED_AT"))])
//!     .values([Selection::from("title"), Aliased::new("url", "link").into()])?;
//!
//! assert_eq!(
//!     query.to_graphql(0)?,
//!     r#"query {repository(owner: "juliuscaeser", name: "rome") {issues(orderBy: CREATED_AT) {title link: url}}}"#
//! );
//! # Ok::<(), graphql_query::Error>(())
//! ```
//!
//! ## Fetching
//!
//! ```no_run
//! use graphql_query::{AutoSubscript, Client};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("https://api.example.com/graphql")
//!         .with_header("Authorization", "Bearer my-token")
//!         .with_middleware(Arc::new(AutoSubscript));
//!
//!     let query = client.query();
//!     query.field("repos").args([("first", 10)]).values(["name"])?;
//!
//!     let repos = query.fetch_async(None).await?;
//!     println!("{repos}");
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod dict;
mod error;
mod middleware;
mod node;
mod printer;
mod selection;
mod transport;
mod value;

pub use client::{Client, RetryPolicy, Variables};
pub use config::{load_config, load_config_from_str, ClientConfig, ConfigError, RetryConfig};
pub use dict::Dict;
pub use error::{Error, Result};
pub use middleware::{AutoSubscript, DictView, Identity, Middleware};
pub use node::Query;
pub use selection::{Aliased, Selection};
pub use transport::{
    AsyncTransport, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
    DEFAULT_TIMEOUT,
};
pub use value::{serialize_arg, to_value, Literal, Value, Variable};
