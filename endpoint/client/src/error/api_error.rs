//! The call-time error taxonomy.

use endpoint_define::{EndpointInstance, ValidationIssues};
use serde_json::Value;
use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

use super::TransportError;
use crate::response::ResponseBody;

/// Status reported for responses that failed schema validation.
pub const DECODE_ERROR_STATUS: u16 = 997;

/// Status reported when the transport produced no response.
pub const NETWORK_ERROR_STATUS: u16 = 998;

/// Discriminant of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum ErrorKind {
    DecodingError,
    NetworkError,
    ClientError,
    ServerError,
}

/// Why a dispatched call failed.
///
/// Exactly one variant describes each failed call. Callers branch on the
/// variant (or [`ApiError::kind`]) rather than on status ranges.
///
/// ## Examples
///
/// ```rust,ignore
/// use endpoint_client::ApiError;
///
/// match client.dispatch(&endpoint, &args).await {
///     Ok(value) => println!("{value}"),
///     Err(ApiError::Client { status, .. }) => eprintln!("rejected with {status}"),
///     Err(err) => eprintln!("{}: {err}", err.kind()),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// The response body, or the call arguments, failed schema validation.
    #[error("Decoding failed: {issues}")]
    Decoding {
        /// Every validation issue found.
        issues: ValidationIssues,
    },

    /// The transport failed before a response was obtained.
    #[error("Network failure: {source}")]
    Network {
        /// The raw transport failure.
        source: TransportError,
    },

    /// The server answered with a 4xx status.
    #[error("Client error {status}: {details}")]
    Client {
        /// The response status, 400-499.
        status: u16,
        /// The response body, decoded as far as possible.
        details: ResponseBody,
    },

    /// The server answered with a 5xx status.
    #[error("Server error {status}: {details}")]
    Server {
        /// The response status, 500-599.
        status: u16,
        /// The response body, decoded as far as possible.
        details: ResponseBody,
    },
}

impl ApiError {
    /// Classifies an HTTP error status.
    ///
    /// Returns `None` for statuses outside 400-599.
    pub fn from_http_status(status: u16, details: ResponseBody) -> Option<Self> {
        match status {
            400..=499 => Some(Self::Client { status, details }),
            500..=599 => Some(Self::Server { status, details }),
            _ => None,
        }
    }

    /// The HTTP status, or the sentinel for non-HTTP failures.
    pub fn status(&self) -> u16 {
        match self {
            Self::Decoding { .. } => DECODE_ERROR_STATUS,
            Self::Network { .. } => NETWORK_ERROR_STATUS,
            Self::Client { status, .. } | Self::Server { status, .. } => *status,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decoding { .. } => ErrorKind::DecodingError,
            Self::Network { .. } => ErrorKind::NetworkError,
            Self::Client { .. } => ErrorKind::ClientError,
            Self::Server { .. } => ErrorKind::ServerError,
        }
    }

    /// Validation issues of a decoding failure.
    pub fn issues(&self) -> Option<&ValidationIssues> {
        match self {
            Self::Decoding { issues } => Some(issues),
            _ => None,
        }
    }

    /// Response body of a client or server error.
    pub fn details(&self) -> Option<&ResponseBody> {
        match self {
            Self::Client { details, .. } | Self::Server { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Validates the body of a client or server error against the schema
    /// `endpoint` declares for its status.
    ///
    /// Returns `None` for other variants and for undeclared statuses.
    pub fn decode_declared(
        &self,
        endpoint: &EndpointInstance,
    ) -> Option<Result<Value, ValidationIssues>> {
        let details = self.details()?;
        endpoint.decode_error_body(self.status(), &details.to_value())
    }
}

impl From<ValidationIssues> for ApiError {
    fn from(issues: ValidationIssues) -> Self {
        Self::Decoding { issues }
    }
}

impl From<TransportError> for ApiError {
    fn from(source: TransportError) -> Self {
        Self::Network { source }
    }
}
