//! Client configuration errors.

use thiserror::Error;

/// Errors in client or hook configuration.
///
/// These occur while setting a client up and indicate invalid
/// configuration rather than a failed call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The URL has no host component.
    #[error("URL has no host: {url}")]
    MissingHost {
        /// The URL as given.
        url: String,
    },

    /// The URL carries a path, which the client configuration cannot hold.
    #[error("Base URL must not have a path, found `{path}`")]
    UnsupportedBasePath {
        /// The path found in the URL.
        path: String,
    },

    /// A default header name or value is not valid HTTP.
    #[error("Invalid header `{name}`: {reason}")]
    InvalidHeader {
        /// The header name as given.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A YAML configuration document could not be read.
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Two hooks were registered under the same name.
    #[error("Duplicate endpoint name: {name}")]
    DuplicateEndpoint {
        /// The repeated name.
        name: String,
    },
}

impl ConfigError {
    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
