//! The transport seam: one request in, one response or failure out.

use std::future::Future;

use bytes::Bytes;
use endpoint_define::RestMethod;
use serde_json::Value;
use tracing::trace;

use crate::error::TransportError;

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: RestMethod,
    pub url: String,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// JSON body; only ever set for mutating verbs.
    pub body: Option<Value>,
}

impl TransportRequest {
    /// The value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as read off the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Sends requests.
///
/// Implementations resolve with the response whatever its status, and fail
/// only when no response was obtained.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// [`Transport`] backed by `reqwest`.
///
/// Timeouts and pooling are whatever the wrapped client was built with.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Converts to the equivalent `reqwest::Method`.
pub fn to_reqwest(method: RestMethod) -> reqwest::Method {
    match method {
        RestMethod::Options => reqwest::Method::OPTIONS,
        RestMethod::Head => reqwest::Method::HEAD,
        RestMethod::Get => reqwest::Method::GET,
        RestMethod::Post => reqwest::Method::POST,
        RestMethod::Put => reqwest::Method::PUT,
        RestMethod::Patch => reqwest::Method::PATCH,
        RestMethod::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest(request.method), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        trace!(status, bytes = body.len(), "response received");

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_method_maps_to_reqwest() {
        for method in RestMethod::iter() {
            assert_eq!(to_reqwest(method).as_str(), method.as_str());
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = TransportRequest {
            method: RestMethod::Get,
            url: "http://test/users".to_string(),
            headers: vec![("Content-type".to_string(), "application/json".to_string())],
            body: None,
        };
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("accept"), None);
    }
}
