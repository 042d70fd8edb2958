//! Where requests are sent.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Protocol, host and optional port of the API server.
///
/// Without a port the URL carries no port segment at all, leaving the
/// protocol's default in effect.
///
/// ## Examples
///
/// ```
/// use endpoint_client::HttpClientConfig;
///
/// let config = HttpClientConfig::new("http", "test").with_port(2020);
/// assert_eq!(config.origin(), "http://test:2020");
///
/// let config = HttpClientConfig::from_url("https://api.example.com").unwrap();
/// assert_eq!(config.origin(), "https://api.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    pub protocol: String,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl HttpClientConfig {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Reads the configuration from a base URL such as `http://localhost:8080`.
    ///
    /// A port equal to the scheme's default is dropped.
    ///
    /// ## Errors
    ///
    /// Returns an error if the URL does not parse, has no host, or has a
    /// path other than `/`.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::MissingHost {
                url: url.to_string(),
            })?
            .to_string();

        if parsed.path() != "/" && !parsed.path().is_empty() {
            return Err(ConfigError::UnsupportedBasePath {
                path: parsed.path().to_string(),
            });
        }

        Ok(Self {
            protocol: parsed.scheme().to_string(),
            host,
            port: parsed.port(),
        })
    }

    /// Reads the configuration from a YAML document.
    ///
    /// ```
    /// use endpoint_client::HttpClientConfig;
    ///
    /// let config = HttpClientConfig::from_yaml_str("protocol: http\nhost: test\n").unwrap();
    /// assert_eq!(config.port, None);
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns an error if the document is not valid YAML for this type.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// `{protocol}://{host}[:{port}]`, without a trailing slash.
    pub fn origin(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.protocol, self.host, port),
            None => format!("{}://{}", self.protocol, self.host),
        }
    }

    /// The full URL for an already-normalized `path_and_query`.
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.origin(), path_and_query)
    }
}
