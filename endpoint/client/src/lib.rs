//! Request dispatch for declarative endpoint definitions.
//!
//! Given an [`EndpointInstance`](endpoint_define::EndpointInstance) and the
//! arguments of one call, [`HttpClient`] validates the arguments, builds the
//! URL, headers and body, performs one transport call and classifies the
//! outcome into a decoded value or one of the four [`ApiError`] variants.
//!
//! ## Modules
//!
//! - [`config`] - where requests go ([`HttpClientConfig`])
//! - [`client`] - [`HttpClient`], its builder and [`CallArgs`]
//! - [`transport`] - the [`Transport`] seam and its reqwest implementation
//! - [`response`] - response classification and decoding
//! - [`query`] - query string and header encoding
//! - [`hooks`] - named hooks over a reactive-fetch collaborator
//! - [`error`] - error types
//!
//! ## Examples
//!
//! ```rust,ignore
//! use endpoint_client::{CallArgs, HttpClient, HttpClientConfig};
//! use endpoint_define::prelude::*;
//! use serde_json::json;
//!
//! let get_crayons = EndpointInstance::builder()
//!     .method(RestMethod::Get)
//!     .path(|p| format!("users/{}/crayons", p.get("id")))
//!     .params([("id", string())])
//!     .query([("color", string())])
//!     .output(object([("crayons", array(string()))]))
//!     .build()?;
//!
//! let client = HttpClient::builder(HttpClientConfig::from_url("http://test:2020")?)
//!     .default_header("Content-type", "application/json")?
//!     .build();
//!
//! let crayons = client
//!     .dispatch(
//!         &get_crayons,
//!         &CallArgs::new()
//!             .params(json!({ "id": "id" }))
//!             .query(json!({ "color": "brown" })),
//!     )
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod query;
pub mod response;
pub mod transport;

pub use client::{CallArgs, HttpClient, HttpClientBuilder};
pub use config::HttpClientConfig;
pub use error::{
    ApiError, ConfigError, DECODE_ERROR_STATUS, ErrorKind, NETWORK_ERROR_STATUS, TransportError,
};
pub use hooks::{Hook, Hooks, ResourceFetcher, ResourceKey, ResourceState, Uncached, generate_hooks};
pub use response::ResponseBody;
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
