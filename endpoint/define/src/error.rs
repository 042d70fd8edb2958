//! Errors raised while building an endpoint definition.

use thiserror::Error;

use crate::group::InputGroup;
use crate::method::RestMethod;

/// A malformed endpoint definition.
///
/// These are programmer errors detected once, when the definition is
/// built. Definition sites are expected to treat them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The same field name appears twice in one input group.
    #[error("Duplicate field `{field}` in {group}")]
    DuplicateField {
        /// The group holding the duplicate.
        group: InputGroup,
        /// The repeated field name.
        field: String,
    },

    /// A field was declared with an empty name.
    #[error("Empty field name in {group}")]
    EmptyFieldName {
        /// The group holding the unnamed field.
        group: InputGroup,
    },

    /// A request body was declared on a non-mutating verb.
    #[error("{method} endpoints cannot declare a request body")]
    BodyNotAllowed {
        /// The endpoint's method.
        method: RestMethod,
    },

    /// A declared error response uses a status outside 400-599.
    #[error("Declared error status {status} is not a 4xx or 5xx status")]
    InvalidErrorStatus {
        /// The offending status.
        status: u16,
    },

    /// The same error status was declared twice.
    #[error("Error status {status} is declared more than once")]
    DuplicateErrorStatus {
        /// The repeated status.
        status: u16,
    },

    /// A required builder field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },
}

impl DefinitionError {
    /// Creates a duplicate field error.
    pub fn duplicate_field(group: InputGroup, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            group,
            field: field.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
