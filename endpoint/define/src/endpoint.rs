//! Endpoint definitions with a type-state builder.
//!
//! An [`EndpointInstance`] is the normalized, immutable form of one endpoint
//! definition: its method, its input groups, its output schema, the error
//! responses it declares and its path template. The [`EndpointBuilder`]
//! tracks the required fields (method, path, output) in its type so an
//! incomplete definition does not compile; everything the type system cannot
//! see is checked by [`EndpointBuilder::build`].
//!
//! ## Examples
//!
//! ```
//! use endpoint_define::{EndpointInstance, RestMethod};
//! use endpoint_define::schema::{array, object, string};
//!
//! let get_crayons = EndpointInstance::builder()
//!     .method(RestMethod::Get)
//!     .path(|p| format!("users/{}/crayons", p.get("id")))
//!     .params([("id", string())])
//!     .query([("color", string())])
//!     .output(object([("crayons", array(string()))]))
//!     .build()
//!     .expect("valid endpoint definition");
//!
//! assert_eq!(get_crayons.static_path_with(|p| format!(":{p}")), "/users/:id/crayons");
//! assert!(get_crayons.input().body().is_none());
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::error::DefinitionError;
use crate::group::{InputGroup, SchemaGroup};
use crate::method::RestMethod;
use crate::path::{PathParams, PathTemplate};
use crate::schema::{SchemaRef, ValidationIssues};

/// Marker types for builder state tracking.
pub mod builder_state {
    /// Marker for a field that has not been set.
    #[derive(Debug)]
    pub struct Missing;
    /// Marker for a field that has been set.
    #[derive(Debug)]
    pub struct Present;
}

use builder_state::{Missing, Present};

/// An error response an endpoint declares, with the schema of its body.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: u16,
    pub schema: SchemaRef,
}

/// The normalized input groups of an endpoint.
///
/// A group the definition did not declare is `None`.
#[derive(Debug, Clone, Default)]
pub struct Input {
    headers: Option<SchemaGroup>,
    params: Option<SchemaGroup>,
    query: Option<SchemaGroup>,
    body: Option<SchemaRef>,
}

impl Input {
    pub fn headers(&self) -> Option<&SchemaGroup> {
        self.headers.as_ref()
    }

    pub fn params(&self) -> Option<&SchemaGroup> {
        self.params.as_ref()
    }

    pub fn query(&self) -> Option<&SchemaGroup> {
        self.query.as_ref()
    }

    /// The body schema; only ever present on mutating verbs.
    pub fn body(&self) -> Option<&SchemaRef> {
        self.body.as_ref()
    }

    /// Returns `true` if the definition declared `group`.
    pub fn declares(&self, group: InputGroup) -> bool {
        match group {
            InputGroup::Headers => self.headers.is_some(),
            InputGroup::Params => self.params.is_some(),
            InputGroup::Query => self.query.is_some(),
            InputGroup::Body => self.body.is_some(),
        }
    }

    /// The normalized schema group for `group`; `Body` is never a group.
    pub fn group(&self, group: InputGroup) -> Option<&SchemaGroup> {
        match group {
            InputGroup::Headers => self.headers(),
            InputGroup::Params => self.params(),
            InputGroup::Query => self.query(),
            InputGroup::Body => None,
        }
    }
}

#[derive(Debug)]
struct Definition {
    method: RestMethod,
    input: Input,
    output: SchemaRef,
    errors: Option<Vec<ErrorResponse>>,
    template: PathTemplate,
    description: Option<String>,
}

/// A built, immutable endpoint definition.
///
/// Cloning is cheap; clones share the same definition.
#[derive(Debug, Clone)]
pub struct EndpointInstance {
    inner: Arc<Definition>,
}

impl EndpointInstance {
    /// Creates a new endpoint builder.
    pub fn builder() -> EndpointBuilder<Missing, Missing, Missing> {
        EndpointBuilder::new()
    }

    pub fn method(&self) -> RestMethod {
        self.inner.method
    }

    pub fn input(&self) -> &Input {
        &self.inner.input
    }

    pub fn output(&self) -> &SchemaRef {
        &self.inner.output
    }

    /// Declared error responses, `None` when the definition declared none.
    pub fn errors(&self) -> Option<&[ErrorResponse]> {
        self.inner.errors.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    /// The concrete path for `params`, with a single leading `/`.
    ///
    /// Endpoints without `Params` take [`PathParams::empty`].
    pub fn path(&self, params: &PathParams<'_>) -> String {
        self.inner.template.render(params)
    }

    /// The path with each parameter replaced by its own name.
    pub fn static_path(&self) -> String {
        self.static_path_with(str::to_string)
    }

    /// The path with each parameter replaced by `format(name)`.
    ///
    /// `format` is never called when the endpoint declares no `Params`.
    pub fn static_path_with<F>(&self, format: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let names = self
            .inner
            .input
            .params()
            .into_iter()
            .flat_map(SchemaGroup::field_names);
        self.inner.template.render_static(names, format)
    }

    /// The declared error response for `status`, if any.
    pub fn error_response(&self, status: u16) -> Option<&ErrorResponse> {
        self.errors()?.iter().find(|e| e.status == status)
    }

    /// Validates an error body against the schema declared for `status`.
    ///
    /// Returns `None` when no schema was declared for that status.
    pub fn decode_error_body(
        &self,
        status: u16,
        body: &Value,
    ) -> Option<Result<Value, ValidationIssues>> {
        self.error_response(status).map(|e| e.schema.validate(body))
    }
}

type Fields = Vec<(String, SchemaRef)>;

fn collect_fields<I, N>(fields: I) -> Fields
where
    I: IntoIterator<Item = (N, SchemaRef)>,
    N: Into<String>,
{
    fields.into_iter().map(|(n, s)| (n.into(), s)).collect()
}

/// Type-state builder for [`EndpointInstance`].
///
/// ## Type Parameters
///
/// - `M`: State of the method field (`Missing` or `Present`).
/// - `P`: State of the path function (`Missing` or `Present`).
/// - `O`: State of the output schema (`Missing` or `Present`).
pub struct EndpointBuilder<M, P, O> {
    method: Option<RestMethod>,
    template: Option<PathTemplate>,
    output: Option<SchemaRef>,
    headers: Option<Fields>,
    params: Option<Fields>,
    query: Option<Fields>,
    body: Option<SchemaRef>,
    errors: Option<Vec<ErrorResponse>>,
    description: Option<String>,
    _state: PhantomData<(M, P, O)>,
}

impl EndpointBuilder<Missing, Missing, Missing> {
    pub fn new() -> Self {
        Self {
            method: None,
            template: None,
            output: None,
            headers: None,
            params: None,
            query: None,
            body: None,
            errors: None,
            description: None,
            _state: PhantomData,
        }
    }
}

impl Default for EndpointBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, P, O> EndpointBuilder<M, P, O> {
    fn transition<M2, P2, O2>(self) -> EndpointBuilder<M2, P2, O2> {
        EndpointBuilder {
            method: self.method,
            template: self.template,
            output: self.output,
            headers: self.headers,
            params: self.params,
            query: self.query,
            body: self.body,
            errors: self.errors,
            description: self.description,
            _state: PhantomData,
        }
    }

    /// Declares the `Headers` group.
    pub fn headers<I, N>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, SchemaRef)>,
        N: Into<String>,
    {
        self.headers = Some(collect_fields(fields));
        self
    }

    /// Declares the `Params` group read by the path function.
    pub fn params<I, N>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, SchemaRef)>,
        N: Into<String>,
    {
        self.params = Some(collect_fields(fields));
        self
    }

    /// Declares the `Query` group; encoding follows the order given here.
    pub fn query<I, N>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, SchemaRef)>,
        N: Into<String>,
    {
        self.query = Some(collect_fields(fields));
        self
    }

    /// Declares the request body. Only valid for POST, PUT and PATCH.
    pub fn body(mut self, schema: SchemaRef) -> Self {
        self.body = Some(schema);
        self
    }

    /// Declares an error response and the schema of its body.
    pub fn error(mut self, status: u16, schema: SchemaRef) -> Self {
        self.errors
            .get_or_insert_with(Vec::new)
            .push(ErrorResponse { status, schema });
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl<P, O> EndpointBuilder<Missing, P, O> {
    pub fn method(mut self, method: RestMethod) -> EndpointBuilder<Present, P, O> {
        self.method = Some(method);
        self.transition()
    }
}

impl<M, O> EndpointBuilder<M, Missing, O> {
    /// Sets the path function.
    ///
    /// The function receives the call's `Params`; a leading `/` is added to
    /// its result when missing.
    pub fn path<F>(mut self, build: F) -> EndpointBuilder<M, Present, O>
    where
        F: Fn(&PathParams<'_>) -> String + Send + Sync + 'static,
    {
        self.template = Some(PathTemplate::new(build));
        self.transition()
    }
}

impl<M, P> EndpointBuilder<M, P, Missing> {
    /// Sets the schema successful responses are decoded with.
    pub fn output(mut self, schema: SchemaRef) -> EndpointBuilder<M, P, Present> {
        self.output = Some(schema);
        self.transition()
    }
}

impl EndpointBuilder<Present, Present, Present> {
    /// Builds the endpoint.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - a group repeats a field name or contains an empty one
    /// - a body is declared on a non-mutating verb
    /// - a declared error status is outside 400-599 or declared twice
    pub fn build(self) -> Result<EndpointInstance, DefinitionError> {
        let Some(method) = self.method else {
            return Err(DefinitionError::missing_field("method"));
        };
        let Some(template) = self.template else {
            return Err(DefinitionError::missing_field("path"));
        };
        let Some(output) = self.output else {
            return Err(DefinitionError::missing_field("output"));
        };

        if self.body.is_some() && !method.has_body() {
            return Err(DefinitionError::BodyNotAllowed { method });
        }

        if let Some(errors) = &self.errors {
            let mut seen = Vec::with_capacity(errors.len());
            for error in errors {
                if !(400..=599).contains(&error.status) {
                    return Err(DefinitionError::InvalidErrorStatus {
                        status: error.status,
                    });
                }
                if seen.contains(&error.status) {
                    return Err(DefinitionError::DuplicateErrorStatus {
                        status: error.status,
                    });
                }
                seen.push(error.status);
            }
        }

        let input = Input {
            headers: SchemaGroup::normalize(InputGroup::Headers, self.headers)?,
            params: SchemaGroup::normalize(InputGroup::Params, self.params)?,
            query: SchemaGroup::normalize(InputGroup::Query, self.query)?,
            body: self.body,
        };

        Ok(EndpointInstance {
            inner: Arc::new(Definition {
                method,
                input,
                output,
                errors: self.errors,
                template,
                description: self.description,
            }),
        })
    }
}
