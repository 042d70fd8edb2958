//! Response decoding and failure classification.
//!
//! A completed response is classified by status first: 4xx and 5xx become
//! [`ApiError::Client`] and [`ApiError::Server`] whatever their body holds.
//! Every other status is decoded against the endpoint's output schema.

use std::fmt;

use bytes::Bytes;
use endpoint_define::{Schema, ValidationIssues};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::transport::TransportResponse;

/// Best-effort view of an error response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON; non-UTF-8 bytes are replaced.
    Text(String),
    /// The body was empty.
    Empty,
}

impl ResponseBody {
    pub fn from_bytes(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        match serde_json::from_slice(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// The body as a JSON value; text becomes a string and empty becomes `null`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Text(text) => Value::String(text.clone()),
            Self::Empty => Value::Null,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Empty => f.write_str("<empty body>"),
        }
    }
}

/// Parses a success body as JSON; an empty body is `null`.
pub fn parse_json(body: &Bytes) -> Result<Value, ValidationIssues> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| ValidationIssues::single("", format!("response body is not valid JSON: {e}")))
}

/// Classifies a completed response and decodes its body against `output`.
///
/// ## Errors
///
/// - [`ApiError::Client`] / [`ApiError::Server`] for 4xx / 5xx statuses
/// - [`ApiError::Decoding`] when any other response does not satisfy `output`
pub fn classify_response(output: &dyn Schema, response: TransportResponse) -> Result<Value, ApiError> {
    let TransportResponse { status, body } = response;

    if (400..=599).contains(&status) {
        let details = ResponseBody::from_bytes(&body);
        debug!(status, "response classified as HTTP failure");
        return match ApiError::from_http_status(status, details) {
            Some(err) => Err(err),
            None => Err(ValidationIssues::single("", format!("unclassified status {status}")).into()),
        };
    }

    let value = parse_json(&body)?;
    output.validate(&value).map_err(|issues| {
        debug!(status, issue_count = issues.len(), "response failed output validation");
        ApiError::Decoding { issues }
    })
}
