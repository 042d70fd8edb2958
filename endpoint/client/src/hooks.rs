//! Named fetch hooks over a set of endpoint definitions.
//!
//! [`generate_hooks`] pairs every endpoint with a name and hands each call
//! to a [`ResourceFetcher`], the reactive-fetch collaborator that decides
//! whether to run the dispatch or answer from its own state. The generator
//! keeps no state of its own.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use endpoint_client::{CallArgs, Uncached, generate_hooks};
//! use serde_json::json;
//!
//! let hooks = generate_hooks(&client, &Uncached, [("getCrayons", get_crayons)])?;
//! let state = hooks
//!     .get("getCrayons")
//!     .expect("declared above")
//!     .call(&CallArgs::new().params(json!({ "id": "id" })).query(json!({ "color": "brown" })))
//!     .await;
//! assert!(state.error.is_none());
//! ```

use std::fmt;
use std::future::Future;

use endpoint_define::{EndpointInstance, RestMethod};
use serde_json::Value;
use tracing::debug;

use crate::client::{CallArgs, HttpClient};
use crate::error::{ApiError, ConfigError};
use crate::transport::Transport;

/// Identifies one call for caching purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    method: RestMethod,
    path: String,
    body: Option<String>,
}

impl ResourceKey {
    /// Builds a key; `body` is kept only for verbs that send one.
    pub fn new(method: RestMethod, path: impl Into<String>, body: Option<&Value>) -> Self {
        let body = body
            .filter(|_| method.has_body())
            .map(ToString::to_string);
        Self {
            method,
            path: path.into(),
            body,
        }
    }

    pub fn method(&self) -> RestMethod {
        self.method
    }

    /// The resolved path, including the encoded query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The serialized body of a mutating call.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if let Some(body) = &self.body {
            write!(f, " {body}")?;
        }
        Ok(())
    }
}

/// What a hook call observed.
#[derive(Debug, Default)]
pub struct ResourceState {
    pub data: Option<Value>,
    pub error: Option<ApiError>,
    /// `true` while a fetch is in flight.
    pub is_validating: bool,
}

impl ResourceState {
    /// The state after a fetch completed.
    pub fn settled(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                error: None,
                is_validating: false,
            },
            Err(error) => Self {
                data: None,
                error: Some(error),
                is_validating: false,
            },
        }
    }
}

/// The reactive-fetch collaborator.
///
/// `fetch` performs exactly one dispatch when awaited. Implementations may
/// skip it (answering from a cache keyed by [`ResourceKey`]), but must not
/// await it more than once.
pub trait ResourceFetcher: Send + Sync {
    fn use_resource<F>(
        &self,
        key: ResourceKey,
        fetch: F,
    ) -> impl Future<Output = ResourceState> + Send
    where
        F: Future<Output = Result<Value, ApiError>> + Send;
}

/// A [`ResourceFetcher`] that always runs the fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncached;

impl ResourceFetcher for Uncached {
    async fn use_resource<F>(&self, key: ResourceKey, fetch: F) -> ResourceState
    where
        F: Future<Output = Result<Value, ApiError>> + Send,
    {
        debug!(%key, "fetching without cache");
        ResourceState::settled(fetch.await)
    }
}

/// Hooks generated by [`generate_hooks`], in declaration order.
#[derive(Debug)]
pub struct Hooks<'c, T, R> {
    client: &'c HttpClient<T>,
    resources: &'c R,
    entries: Vec<(String, EndpointInstance)>,
}

/// Generates one named hook per endpoint.
///
/// ## Errors
///
/// Returns [`ConfigError::DuplicateEndpoint`] if a name is used twice.
pub fn generate_hooks<'c, T, R, I, N>(
    client: &'c HttpClient<T>,
    resources: &'c R,
    endpoints: I,
) -> Result<Hooks<'c, T, R>, ConfigError>
where
    T: Transport,
    R: ResourceFetcher,
    I: IntoIterator<Item = (N, EndpointInstance)>,
    N: Into<String>,
{
    let mut entries: Vec<(String, EndpointInstance)> = Vec::new();
    for (name, endpoint) in endpoints {
        let name = name.into();
        if entries.iter().any(|(existing, _)| *existing == name) {
            return Err(ConfigError::DuplicateEndpoint { name });
        }
        entries.push((name, endpoint));
    }
    debug!(count = entries.len(), "hooks generated");

    Ok(Hooks {
        client,
        resources,
        entries,
    })
}

impl<'c, T: Transport, R: ResourceFetcher> Hooks<'c, T, R> {
    /// Hook names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<Hook<'_, T, R>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(name, endpoint)| Hook {
                name,
                endpoint,
                client: self.client,
                resources: self.resources,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One named endpoint bound to a client and a fetch collaborator.
#[derive(Debug)]
pub struct Hook<'h, T, R> {
    name: &'h str,
    endpoint: &'h EndpointInstance,
    client: &'h HttpClient<T>,
    resources: &'h R,
}

impl<T: Transport, R: ResourceFetcher> Hook<'_, T, R> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn endpoint(&self) -> &EndpointInstance {
        self.endpoint
    }

    /// Calls the endpoint through the fetch collaborator.
    ///
    /// Arguments that break the group contract settle immediately with a
    /// decoding error; the collaborator is not consulted.
    pub async fn call(&self, args: &CallArgs) -> ResourceState {
        let key = match self.client.resource_key(self.endpoint, args) {
            Ok(key) => key,
            Err(err) => {
                debug!(hook = self.name, error = %err, "hook arguments rejected");
                return ResourceState::settled(Err(err));
            }
        };

        let fetch = self.client.dispatch(self.endpoint, args);
        self.resources.use_resource(key, fetch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_keeps_body_only_for_mutating_verbs() {
        let body = json!({ "name": "John" });

        let key = ResourceKey::new(RestMethod::Post, "/users", Some(&body));
        assert_eq!(key.body(), Some(r#"{"name":"John"}"#));
        assert_eq!(key.to_string(), r#"POST /users {"name":"John"}"#);

        let key = ResourceKey::new(RestMethod::Delete, "/users/1", Some(&body));
        assert_eq!(key.body(), None);
        assert_eq!(key.to_string(), "DELETE /users/1");
    }

    #[test]
    fn settled_state_is_not_validating() {
        let state = ResourceState::settled(Ok(json!(1)));
        assert_eq!(state.data, Some(json!(1)));
        assert!(state.error.is_none());
        assert!(!state.is_validating);
    }

    #[tokio::test]
    async fn uncached_runs_the_fetch() {
        let key = ResourceKey::new(RestMethod::Get, "/health", None);
        let state = Uncached
            .use_resource(key, async { Ok(json!({ "ok": true })) })
            .await;
        assert_eq!(state.data, Some(json!({ "ok": true })));
    }
}
