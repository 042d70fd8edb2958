//! Failures of the transport layer.

use thiserror::Error;

/// The transport produced no response.
///
/// This is the raw failure reported as the details of
/// [`ApiError::Network`](super::ApiError::Network).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client failed (connect, TLS, protocol, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A transport rejected the request with a plain reason.
    #[error("{reason}")]
    Rejected {
        /// Why the request was rejected.
        reason: String,
    },
}

impl TransportError {
    /// Creates a rejection with `reason`.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the failure happened while connecting.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect(),
            Self::Rejected { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_displays_its_reason() {
        let err = TransportError::rejected("connection reset");
        assert_eq!(err.to_string(), "connection reset");
        assert!(!err.is_connect());
    }
}
