//! Shared fixtures for client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use bytes::Bytes;
use endpoint_client::{
    HttpClient, HttpClientConfig, Transport, TransportError, TransportRequest, TransportResponse,
};
use endpoint_define::prelude::*;
use serde_json::Value;

/// Transport that records every request and answers from a queue.
///
/// An empty queue answers `200` with a `null` body.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<TransportRequest>>,
    replies: Mutex<VecDeque<Result<TransportResponse, String>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response.
    pub fn respond(self, status: u16, body: Value) -> Self {
        self.respond_raw(status, &body.to_string())
    }

    /// Queues a response with a raw body.
    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(TransportResponse {
            status,
            body: Bytes::from(body.to_string()),
        }));
        self
    }

    /// Queues a rejection; no response is produced.
    pub fn reject(self, reason: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(TransportError::rejected(reason)),
            None => Ok(TransportResponse {
                status: 200,
                body: Bytes::from_static(b"null"),
            }),
        }
    }
}

pub fn port_config() -> HttpClientConfig {
    HttpClientConfig::new("http", "test").with_port(2020)
}

pub fn no_port_config() -> HttpClientConfig {
    HttpClientConfig::new("http", "test")
}

/// A client sending `Content-type: application/json` by default.
pub fn client(
    config: HttpClientConfig,
    transport: RecordingTransport,
) -> HttpClient<RecordingTransport> {
    HttpClient::builder(config)
        .default_header("Content-type", "application/json")
        .unwrap()
        .transport(transport)
        .build()
}

// =============================================================================
// Endpoint fixtures
// =============================================================================

pub fn get_endpoint() -> EndpointInstance {
    EndpointInstance::builder()
        .method(RestMethod::Get)
        .path(|p| format!("users/{}/crayons", p.get("id")))
        .query([("color", string())])
        .params([("id", string())])
        .output(object([("crayons", array(string()))]))
        .build()
        .unwrap()
}

pub fn get_endpoint_with_large_query() -> EndpointInstance {
    EndpointInstance::builder()
        .method(RestMethod::Get)
        .path(|p| format!("users/{}/crayons/{}", p.get("id"), p.get("crayonSet")))
        .query([("foo", string()), ("bar", number()), ("baz", string())])
        .params([("id", number()), ("crayonSet", number())])
        .output(object([("crayons", array(string()))]))
        .build()
        .unwrap()
}

fn person() -> SchemaRef {
    object([("name", string()), ("surname", string()), ("age", number())])
}

pub fn post_endpoint() -> EndpointInstance {
    EndpointInstance::builder()
        .method(RestMethod::Post)
        .path(|_| "users".to_string())
        .params([("id", string())])
        .body(person())
        .output(object([("id", string())]))
        .build()
        .unwrap()
}

pub fn put_endpoint() -> EndpointInstance {
    EndpointInstance::builder()
        .method(RestMethod::Put)
        .path(|p| format!("users/{}", p.get("id")))
        .params([("id", string())])
        .body(person())
        .output(object([("userId", string())]))
        .build()
        .unwrap()
}

pub fn delete_endpoint() -> EndpointInstance {
    EndpointInstance::builder()
        .method(RestMethod::Delete)
        .path(|p| format!("users/{}", p.get("id")))
        .params([("id", string())])
        .output(object([("id", string())]))
        .build()
        .unwrap()
}

pub fn patch_endpoint() -> EndpointInstance {
    EndpointInstance::builder()
        .method(RestMethod::Patch)
        .path(|p| format!("users/{}", p.get("id")))
        .params([("id", string())])
        .body(object([("name", string())]))
        .output(object([("id", string())]))
        .build()
        .unwrap()
}

/// Every fixture, named, in declaration order.
pub fn endpoints() -> Vec<(&'static str, EndpointInstance)> {
    vec![
        ("getEndpoint", get_endpoint()),
        ("getEndpointWithLargeQuery", get_endpoint_with_large_query()),
        ("postEndpoint", post_endpoint()),
        ("putEndpoint", put_endpoint()),
        ("deleteEndpoint", delete_endpoint()),
        ("patchEndpoint", patch_endpoint()),
    ]
}
