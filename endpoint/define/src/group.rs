//! Normalization of input field declarations into named composite schemas.

use std::collections::HashSet;

use serde_json::Value;
use strum::{Display, EnumIter};

use crate::error::DefinitionError;
use crate::schema::{ObjectSchema, Schema, SchemaRef, ValidationIssues};

/// The input groups a call may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum InputGroup {
    Headers,
    Params,
    Query,
    Body,
}

/// A named composite schema over uniquely named fields.
///
/// The group validates an object with exactly its declared fields and
/// remembers their declaration order, which fixes the order of encoded
/// query strings and merged headers.
#[derive(Debug, Clone)]
pub struct SchemaGroup {
    group: InputGroup,
    object: ObjectSchema,
}

impl SchemaGroup {
    /// Normalizes an optional field declaration.
    ///
    /// An absent declaration stays absent; it never becomes an empty group.
    ///
    /// ## Errors
    ///
    /// Returns an error if a field name is empty or repeated.
    pub fn normalize<I, N>(
        group: InputGroup,
        fields: Option<I>,
    ) -> Result<Option<Self>, DefinitionError>
    where
        I: IntoIterator<Item = (N, SchemaRef)>,
        N: Into<String>,
    {
        match fields {
            Some(fields) => Self::new(group, fields).map(Some),
            None => Ok(None),
        }
    }

    /// Builds a group from its field declarations.
    ///
    /// ## Errors
    ///
    /// Returns an error if a field name is empty or repeated.
    pub fn new<I, N>(group: InputGroup, fields: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = (N, SchemaRef)>,
        N: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut declared = Vec::new();

        for (name, schema) in fields {
            let name = name.into();
            if name.is_empty() {
                return Err(DefinitionError::EmptyFieldName { group });
            }
            if !seen.insert(name.clone()) {
                return Err(DefinitionError::duplicate_field(group, name));
            }
            declared.push((name, schema));
        }

        Ok(Self {
            group,
            object: ObjectSchema::new(group.to_string(), declared),
        })
    }

    pub fn group(&self) -> InputGroup {
        self.group
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.object.fields().iter().map(|(name, _)| name.as_str())
    }

    pub fn fields(&self) -> &[(String, SchemaRef)] {
        self.object.fields()
    }

    pub fn field(&self, name: &str) -> Option<&SchemaRef> {
        self.object.field(name)
    }

    pub fn len(&self) -> usize {
        self.object.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.object.fields().is_empty()
    }
}

impl Schema for SchemaGroup {
    fn name(&self) -> String {
        self.group.to_string()
    }

    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues> {
        self.object.validate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{number, optional, string};
    use serde_json::json;

    #[test]
    fn absent_declaration_stays_absent() {
        let group =
            SchemaGroup::normalize::<Vec<(String, SchemaRef)>, String>(InputGroup::Query, None)
                .unwrap();
        assert!(group.is_none());
    }

    #[test]
    fn empty_declaration_is_present() {
        let group =
            SchemaGroup::normalize(InputGroup::Headers, Some(Vec::<(String, SchemaRef)>::new()))
                .unwrap()
                .unwrap();
        assert!(group.is_empty());
        assert!(group.validate(&json!({})).is_ok());
    }

    #[test]
    fn group_is_named_after_its_kind() {
        let group = SchemaGroup::new(InputGroup::Params, [("id", string())]).unwrap();
        assert_eq!(group.name(), "Params");
        assert_eq!(group.group(), InputGroup::Params);
    }

    #[test]
    fn keeps_declaration_order() {
        let group = SchemaGroup::new(
            InputGroup::Query,
            [("foo", string()), ("bar", number()), ("baz", string())],
        )
        .unwrap();
        let names: Vec<_> = group.field_names().collect();
        assert_eq!(names, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn rejects_duplicate_fields() {
        let err = SchemaGroup::new(InputGroup::Query, [("color", string()), ("color", number())])
            .unwrap_err();
        assert_eq!(err, DefinitionError::duplicate_field(InputGroup::Query, "color"));
    }

    #[test]
    fn rejects_empty_field_names() {
        let err = SchemaGroup::new(InputGroup::Headers, [("", string())]).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::EmptyFieldName {
                group: InputGroup::Headers
            }
        );
    }

    #[test]
    fn validation_is_exact() {
        let group = SchemaGroup::new(
            InputGroup::Query,
            [("color", string()), ("size", optional(number()))],
        )
        .unwrap();

        assert!(group.validate(&json!({ "color": "brown" })).is_ok());

        let issues = group
            .validate(&json!({ "color": "brown", "shade": "dark" }))
            .unwrap_err();
        assert!(issues.has_path("shade"));

        let issues = group.validate(&json!({ "size": 3 })).unwrap_err();
        assert!(issues.has_path("color"));

        assert!(group.validate(&json!("color=brown")).is_err());
    }
}
