//! Everything needed to author endpoint definitions.
//!
//! ```
//! use endpoint_define::prelude::*;
//!
//! let health = EndpointInstance::builder()
//!     .method(RestMethod::Get)
//!     .path(|_| "health".to_string())
//!     .output(object([("ok", boolean())]))
//!     .build()
//!     .unwrap();
//! assert_eq!(health.method(), RestMethod::Get);
//! ```

pub use crate::endpoint::{EndpointInstance, ErrorResponse};
pub use crate::error::DefinitionError;
pub use crate::group::{InputGroup, SchemaGroup};
pub use crate::method::RestMethod;
pub use crate::path::PathParams;
pub use crate::schema::{
    Schema, SchemaRef, ValidationIssue, ValidationIssues, array, boolean, integer, literal,
    number, object, optional, string, typed,
};
