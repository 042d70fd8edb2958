//! Declarative HTTP endpoint definitions.
//!
//! An endpoint is defined once, as data, and everything a client needs is
//! derived from that definition:
//!
//! - [`RestMethod`] - the fixed set of HTTP verbs
//! - [`schema`] - the validation vocabulary ([`Schema`], [`SchemaRef`] and
//!   primitive constructors such as [`schema::string`])
//! - [`SchemaGroup`] - a named composite schema for `Headers`, `Params` or `Query`
//! - [`PathTemplate`] - path functions normalized to a single leading `/`
//! - [`EndpointInstance`] - the immutable, normalized endpoint, built with
//!   [`EndpointInstance::builder`]
//!
//! This crate performs no I/O; request dispatch lives in `endpoint-client`.
//!
//! ## Examples
//!
//! ```
//! use endpoint_define::prelude::*;
//!
//! let create_user = EndpointInstance::builder()
//!     .method(RestMethod::Post)
//!     .path(|_| "users".to_string())
//!     .body(object([("name", string()), ("age", number())]))
//!     .output(object([("id", string())]))
//!     .build()
//!     .expect("valid endpoint definition");
//!
//! assert_eq!(create_user.static_path(), "/users");
//! ```

pub mod endpoint;
pub mod error;
pub mod group;
pub mod method;
pub mod path;
pub mod prelude;
pub mod schema;

pub use endpoint::{EndpointBuilder, EndpointInstance, ErrorResponse, Input};
pub use error::DefinitionError;
pub use group::{InputGroup, SchemaGroup};
pub use method::RestMethod;
pub use path::{PathFn, PathParams, PathTemplate};
pub use schema::{Schema, SchemaRef, ValidationIssue, ValidationIssues};
