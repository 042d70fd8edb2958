//! Request dispatch with tracing instrumentation.
//!
//! This module provides [`HttpClient`], which turns an [`EndpointInstance`]
//! plus [`CallArgs`] into one transport call and classifies the outcome into
//! a decoded value or an [`ApiError`].

use endpoint_define::{
    EndpointInstance, InputGroup, PathParams, Schema, SchemaGroup, ValidationIssue,
    ValidationIssues,
};
use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use tracing::{Span, debug, instrument, warn};

use crate::config::HttpClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::hooks::ResourceKey;
use crate::query::{encode_query, merge_headers};
use crate::response::classify_response;
use crate::transport::{ReqwestTransport, Transport, TransportRequest};

/// The arguments of one call.
///
/// A call must supply exactly the groups its endpoint declares: a declared
/// group may not be left out and an undeclared one may not be given. Groups
/// are JSON objects; the body is any JSON value.
///
/// ## Examples
///
/// ```
/// use endpoint_client::CallArgs;
/// use serde_json::json;
///
/// let args = CallArgs::new()
///     .params(json!({ "id": "id" }))
///     .query(json!({ "color": "brown" }));
/// assert!(args.body_value().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    headers: Option<Value>,
    params: Option<Value>,
    query: Option<Value>,
    body: Option<Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(mut self, headers: Value) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The value supplied for `group`.
    pub fn group(&self, group: InputGroup) -> Option<&Value> {
        match group {
            InputGroup::Headers => self.headers.as_ref(),
            InputGroup::Params => self.params.as_ref(),
            InputGroup::Query => self.query.as_ref(),
            InputGroup::Body => self.body.as_ref(),
        }
    }

    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Call arguments that passed the group contract and validation.
#[derive(Debug, Default)]
struct CheckedArgs {
    headers: Map<String, Value>,
    params: Map<String, Value>,
    query: Map<String, Value>,
}

impl CheckedArgs {
    fn slot(&mut self, group: InputGroup) -> Option<&mut Map<String, Value>> {
        match group {
            InputGroup::Headers => Some(&mut self.headers),
            InputGroup::Params => Some(&mut self.params),
            InputGroup::Query => Some(&mut self.query),
            InputGroup::Body => None,
        }
    }
}

/// Enforces that `args` supplies exactly the declared groups, and validates
/// every supplied group except the body.
fn check_args(endpoint: &EndpointInstance, args: &CallArgs) -> Result<CheckedArgs, ValidationIssues> {
    let mut checked = CheckedArgs::default();
    let mut issues = ValidationIssues::default();

    for group in InputGroup::iter() {
        let name = group.to_string();
        match (endpoint.input().declares(group), args.group(group)) {
            (true, None) => issues.push(ValidationIssue::new(
                name,
                "group is declared by the endpoint but was not supplied",
            )),
            (false, Some(_)) => issues.push(ValidationIssue::new(
                name,
                "group is not declared by the endpoint",
            )),
            (false, None) => {}
            (true, Some(value)) => {
                let Some(schema) = endpoint.input().group(group) else {
                    // the body is passed through unvalidated
                    continue;
                };
                match validate_group(schema, value) {
                    Ok(map) => {
                        if let Some(slot) = checked.slot(group) {
                            *slot = map;
                        }
                    }
                    Err(e) => issues.extend(e.nested(&name)),
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(checked)
    } else {
        Err(issues)
    }
}

fn validate_group(schema: &SchemaGroup, value: &Value) -> Result<Map<String, Value>, ValidationIssues> {
    match schema.validate(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationIssues::single("", "expected object")),
    }
}

/// Builder for configuring an [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder<T = ReqwestTransport> {
    config: HttpClientConfig,
    default_headers: Vec<(String, String)>,
    transport: T,
}

impl HttpClientBuilder<ReqwestTransport> {
    fn new(config: HttpClientConfig) -> Self {
        Self {
            config,
            default_headers: Vec::new(),
            transport: ReqwestTransport::new(),
        }
    }
}

impl<T: Transport> HttpClientBuilder<T> {
    /// Adds a header sent with every request.
    ///
    /// Setting a name again (in any case) replaces the earlier value.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// let client = HttpClient::builder(config)
    ///     .default_header("Content-type", "application/json")?
    ///     .build();
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let name = name.as_ref();
        let value = value.as_ref();
        HeaderName::try_from(name).map_err(|e| ConfigError::invalid_header(name, e))?;
        HeaderValue::try_from(value).map_err(|e| ConfigError::invalid_header(name, e))?;

        match self
            .default_headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.to_string(), value.to_string()),
            None => self
                .default_headers
                .push((name.to_string(), value.to_string())),
        }
        Ok(self)
    }

    /// Replaces the transport.
    pub fn transport<U: Transport>(self, transport: U) -> HttpClientBuilder<U> {
        HttpClientBuilder {
            config: self.config,
            default_headers: self.default_headers,
            transport,
        }
    }

    pub fn build(self) -> HttpClient<T> {
        HttpClient {
            config: self.config,
            default_headers: self.default_headers,
            transport: self.transport,
        }
    }
}

/// Async client dispatching calls to endpoint definitions.
///
/// Every call validates its arguments, builds its own URL, headers and body,
/// makes exactly one transport call and classifies the outcome. Nothing is
/// retried or cached.
///
/// ## Examples
///
/// ```rust,ignore
/// use endpoint_client::{CallArgs, HttpClient, HttpClientConfig};
/// use serde_json::json;
///
/// let client = HttpClient::builder(HttpClientConfig::new("http", "test").with_port(2020))
///     .default_header("Content-type", "application/json")?
///     .build();
///
/// let crayons = client
///     .dispatch(&get_crayons, &CallArgs::new()
///         .params(json!({ "id": "id" }))
///         .query(json!({ "color": "brown" })))
///     .await?;
/// // requested http://test:2020/users/id/crayons?color=brown
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient<T = ReqwestTransport> {
    config: HttpClientConfig,
    default_headers: Vec<(String, String)>,
    transport: T,
}

impl HttpClient<ReqwestTransport> {
    /// Creates a new builder using the reqwest transport.
    pub fn builder(config: HttpClientConfig) -> HttpClientBuilder<ReqwestTransport> {
        HttpClientBuilder::new(config)
    }

    /// Creates a client with no default headers.
    pub fn new(config: HttpClientConfig) -> Self {
        Self::builder(config).build()
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves a call into the request it would send, without sending it.
    ///
    /// ## Errors
    ///
    /// Returns [`ApiError::Decoding`] when the arguments break the group
    /// contract or fail validation.
    pub fn prepare(
        &self,
        endpoint: &EndpointInstance,
        args: &CallArgs,
    ) -> Result<TransportRequest, ApiError> {
        self.resolve(endpoint, args).map(|(_, request)| request)
    }

    /// The cache key identifying a call.
    ///
    /// ## Errors
    ///
    /// Same as [`HttpClient::prepare`].
    pub fn resource_key(
        &self,
        endpoint: &EndpointInstance,
        args: &CallArgs,
    ) -> Result<ResourceKey, ApiError> {
        self.resolve(endpoint, args)
            .map(|(path, request)| ResourceKey::new(request.method, path, request.body.as_ref()))
    }

    fn resolve(
        &self,
        endpoint: &EndpointInstance,
        args: &CallArgs,
    ) -> Result<(String, TransportRequest), ApiError> {
        let checked = check_args(endpoint, args).inspect_err(|issues| {
            debug!(%issues, "call arguments rejected");
        })?;

        let mut path = endpoint.path(&PathParams::borrowed(&checked.params));
        if let Some(group) = endpoint.input().query() {
            let query = encode_query(group, &checked.query);
            if !query.is_empty() {
                path.push('?');
                path.push_str(&query);
            }
        }

        let headers = merge_headers(
            &self.default_headers,
            endpoint.input().headers(),
            &checked.headers,
        );

        let body = if endpoint.method().has_body() && endpoint.input().body().is_some() {
            args.body.clone()
        } else {
            None
        };

        let request = TransportRequest {
            method: endpoint.method(),
            url: self.config.url_for(&path),
            headers,
            body,
        };
        Ok((path, request))
    }

    /// Dispatches one call and decodes the response against the endpoint's
    /// output schema.
    ///
    /// ## Errors
    ///
    /// Returns exactly one of:
    /// - [`ApiError::Decoding`] - invalid arguments, or a non-error response
    ///   that does not satisfy the output schema
    /// - [`ApiError::Network`] - the transport produced no response
    /// - [`ApiError::Client`] - a 4xx response
    /// - [`ApiError::Server`] - a 5xx response
    pub async fn dispatch(
        &self,
        endpoint: &EndpointInstance,
        args: &CallArgs,
    ) -> Result<Value, ApiError> {
        let request = self.prepare(endpoint, args)?;
        self.execute(endpoint, request).await
    }

    /// Like [`HttpClient::dispatch`], deserializing the decoded value into `O`.
    ///
    /// ## Errors
    ///
    /// Same as [`HttpClient::dispatch`]; a value that does not deserialize
    /// into `O` is a [`ApiError::Decoding`] error.
    pub async fn dispatch_as<O: DeserializeOwned>(
        &self,
        endpoint: &EndpointInstance,
        args: &CallArgs,
    ) -> Result<O, ApiError> {
        let value = self.dispatch(endpoint, args).await?;
        serde_json::from_value(value)
            .map_err(|e| ValidationIssues::single("", e.to_string()).into())
    }

    /// Sends an already prepared request and classifies the outcome.
    ///
    /// ## Errors
    ///
    /// See [`HttpClient::dispatch`].
    #[instrument(
        name = "endpoint_dispatch",
        skip_all,
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute(
        &self,
        endpoint: &EndpointInstance,
        request: TransportRequest,
    ) -> Result<Value, ApiError> {
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(source) => {
                warn!(error = %source, "transport produced no response");
                Span::current().record("otel.status_code", "ERROR");
                return Err(ApiError::Network { source });
            }
        };

        Span::current().record("http.status_code", response.status);

        let result = classify_response(endpoint.output().as_ref(), response);
        let otel_status = match &result {
            Ok(_) => "OK",
            Err(ApiError::Server { .. }) => "ERROR",
            Err(_) => "UNSET",
        };
        Span::current().record("otel.status_code", otel_status);

        if let Err(err) = &result {
            debug!(kind = %err.kind(), status = err.status(), "call failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endpoint_define::prelude::*;
    use serde_json::json;

    fn get_crayons() -> EndpointInstance {
        EndpointInstance::builder()
            .method(RestMethod::Get)
            .path(|p| format!("users/{}/crayons", p.get("id")))
            .params([("id", string())])
            .query([("color", string())])
            .output(object([("crayons", array(string()))]))
            .build()
            .unwrap()
    }

    fn patch_user() -> EndpointInstance {
        EndpointInstance::builder()
            .method(RestMethod::Patch)
            .path(|p| format!("users/{}", p.get("id")))
            .params([("id", string())])
            .headers([("x-request-id", string())])
            .body(object([("name", string())]))
            .output(object([("id", string())]))
            .build()
            .unwrap()
    }

    fn client() -> HttpClient {
        HttpClient::builder(HttpClientConfig::new("http", "test").with_port(2020))
            .default_header("Content-type", "application/json")
            .unwrap()
            .build()
    }

    #[test]
    fn prepares_get_request() {
        let args = CallArgs::new()
            .params(json!({ "id": "id" }))
            .query(json!({ "color": "brown" }));
        let request = client().prepare(&get_crayons(), &args).unwrap();

        assert_eq!(request.method, RestMethod::Get);
        assert_eq!(request.url, "http://test:2020/users/id/crayons?color=brown");
        assert_eq!(
            request.headers,
            vec![("Content-type".to_string(), "application/json".to_string())]
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn prepares_patch_request_with_body_and_headers() {
        let args = CallArgs::new()
            .params(json!({ "id": "1" }))
            .headers(json!({ "x-request-id": "r-1" }))
            .body(json!({ "name": "John" }));
        let request = client().prepare(&patch_user(), &args).unwrap();

        assert_eq!(request.url, "http://test:2020/users/1");
        assert_eq!(request.body, Some(json!({ "name": "John" })));
        assert_eq!(request.header("x-request-id"), Some("r-1"));
        assert_eq!(request.header("content-type"), Some("application/json"));
    }

    #[test]
    fn body_is_not_validated() {
        let args = CallArgs::new()
            .params(json!({ "id": "1" }))
            .headers(json!({ "x-request-id": "r-1" }))
            .body(json!({ "name": 42, "extra": true }));
        let request = client().prepare(&patch_user(), &args).unwrap();
        assert_eq!(request.body, Some(json!({ "name": 42, "extra": true })));
    }

    #[test]
    fn missing_declared_group_is_rejected() {
        let args = CallArgs::new().params(json!({ "id": "id" }));
        let err = client().prepare(&get_crayons(), &args).unwrap_err();
        assert!(err.issues().unwrap().has_path("Query"));
    }

    #[test]
    fn undeclared_group_is_rejected() {
        let args = CallArgs::new()
            .params(json!({ "id": "id" }))
            .query(json!({ "color": "brown" }))
            .body(json!({ "name": "John" }));
        let err = client().prepare(&get_crayons(), &args).unwrap_err();
        assert!(err.issues().unwrap().has_path("Body"));
    }

    #[test]
    fn group_validation_issues_are_rooted_at_the_group() {
        let args = CallArgs::new()
            .params(json!({ "id": 7 }))
            .query(json!({ "colour": "brown" }));
        let err = client().prepare(&get_crayons(), &args).unwrap_err();
        let issues = err.issues().unwrap();

        assert!(issues.has_path("Params.id"));
        assert!(issues.has_path("Query.color"));
        assert!(issues.has_path("Query.colour"));
    }

    #[test]
    fn default_headers_are_validated() {
        let err = HttpClient::builder(HttpClientConfig::new("http", "test"))
            .default_header("Bad Header", "x")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { .. }));

        let err = HttpClient::builder(HttpClientConfig::new("http", "test"))
            .default_header("X-Ok", "line\nbreak")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { .. }));
    }

    #[test]
    fn default_headers_replace_case_insensitively() {
        let client = HttpClient::builder(HttpClientConfig::new("http", "test"))
            .default_header("Accept", "text/plain")
            .unwrap()
            .default_header("accept", "application/json")
            .unwrap()
            .build();
        assert_eq!(
            client.default_headers(),
            &[("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn resource_key_uses_resolved_path() {
        let args = CallArgs::new()
            .params(json!({ "id": "id" }))
            .query(json!({ "color": "brown" }));
        let key = client().resource_key(&get_crayons(), &args).unwrap();
        assert_eq!(key.path(), "/users/id/crayons?color=brown");
        assert_eq!(key.body(), None);
    }
}
