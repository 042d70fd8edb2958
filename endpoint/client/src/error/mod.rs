//! Layered error types for the client crate.
//!
//! - [`ApiError`] - the four ways a dispatched call can fail
//! - [`TransportError`] - why the transport produced no response
//! - [`ConfigError`] - client construction and configuration errors

mod api_error;
mod config_error;
mod transport_error;

pub use api_error::{ApiError, DECODE_ERROR_STATUS, ErrorKind, NETWORK_ERROR_STATUS};
pub use config_error::ConfigError;
pub use transport_error::TransportError;
