//! Validation schemas for endpoint inputs and outputs.
//!
//! A [`Schema`] checks a raw JSON value and either returns the decoded value
//! or every [`ValidationIssue`] it found, each tagged with the path of the
//! offending value. The constructors in this module cover the primitive
//! shapes needed to author definitions; any type implementing [`Schema`] can
//! be used in their place.
//!
//! ## Examples
//!
//! ```
//! use endpoint_define::schema::{self, Schema};
//! use serde_json::json;
//!
//! let crayons = schema::object([("crayons", schema::array(schema::string()))]);
//!
//! assert!(crayons.validate(&json!({ "crayons": ["red"] })).is_ok());
//!
//! let issues = crayons.validate(&json!({ "crayons": [1] })).unwrap_err();
//! assert_eq!(issues.issues()[0].path, "crayons[0]");
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location of the value, e.g. `crayons[0]` or `Query.color`.
    /// Empty when the issue concerns the root value.
    pub path: String,
    /// What was wrong with the value.
    pub message: String,
}

impl ValidationIssue {
    /// Creates an issue at `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Re-roots the issue below `parent`.
    pub fn nested(mut self, parent: &str) -> Self {
        self.path = if self.path.is_empty() {
            parent.to_string()
        } else if self.path.starts_with('[') {
            format!("{parent}{}", self.path)
        } else {
            format!("{parent}.{}", self.path)
        };
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every issue found while validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", summarize(.0))]
pub struct ValidationIssues(Vec<ValidationIssue>);

fn summarize(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "no validation issues".to_string();
    }
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationIssues {
    /// Wraps a list of issues.
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self(issues)
    }

    /// A list holding exactly one issue.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![ValidationIssue::new(path, message)])
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.0.push(issue);
    }

    /// Moves every issue of `other` into `self`.
    pub fn extend(&mut self, other: ValidationIssues) {
        self.0.extend(other.0);
    }

    /// Re-roots every issue below `parent`.
    pub fn nested(self, parent: &str) -> Self {
        Self(self.0.into_iter().map(|i| i.nested(parent)).collect())
    }

    /// Returns `true` if some issue is located exactly at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|i| i.path == path)
    }

    pub fn into_vec(self) -> Vec<ValidationIssue> {
        self.0
    }
}

impl From<Vec<ValidationIssue>> for ValidationIssues {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        Self(issues)
    }
}

impl IntoIterator for ValidationIssues {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A validator for one shape of JSON value.
pub trait Schema: fmt::Debug + Send + Sync {
    /// Name used in diagnostics, e.g. `string` or `Params`.
    fn name(&self) -> String;

    /// Validates `value`, returning the decoded value on success.
    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues>;

    /// Whether an object field with this schema may be omitted.
    fn accepts_missing(&self) -> bool {
        false
    }
}

/// Shared handle to a schema.
pub type SchemaRef = Arc<dyn Schema>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
}

/// Schema for a single JSON scalar type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveSchema(Primitive);

impl Schema for PrimitiveSchema {
    fn name(&self) -> String {
        let name = match self.0 {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Integer => "integer",
            Primitive::Boolean => "boolean",
        };
        name.to_string()
    }

    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues> {
        let matches = match self.0 {
            Primitive::String => value.is_string(),
            Primitive::Number => value.is_number(),
            Primitive::Integer => value.is_i64() || value.is_u64(),
            Primitive::Boolean => value.is_boolean(),
        };
        if matches {
            Ok(value.clone())
        } else {
            Err(mismatch(&self.name(), value))
        }
    }
}

/// Schema for a homogeneous JSON array.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    item: SchemaRef,
}

impl Schema for ArraySchema {
    fn name(&self) -> String {
        format!("Array<{}>", self.item.name())
    }

    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues> {
        let Some(items) = value.as_array() else {
            return Err(mismatch(&self.name(), value));
        };

        let mut decoded = Vec::with_capacity(items.len());
        let mut issues = ValidationIssues::default();
        for (index, item) in items.iter().enumerate() {
            match self.item.validate(item) {
                Ok(v) => decoded.push(v),
                Err(e) => issues.extend(e.nested(&format!("[{index}]"))),
            }
        }

        if issues.is_empty() {
            Ok(Value::Array(decoded))
        } else {
            Err(issues)
        }
    }
}

/// Schema for a JSON object with exactly the declared fields.
///
/// Missing fields and unknown extra fields are both reported. Fields whose
/// schema [accepts missing values](Schema::accepts_missing) may be omitted.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    name: String,
    fields: Vec<(String, SchemaRef)>,
}

impl ObjectSchema {
    /// Creates an object schema; field order is kept as declared.
    pub fn new(name: impl Into<String>, fields: Vec<(String, SchemaRef)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn fields(&self) -> &[(String, SchemaRef)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SchemaRef> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }
}

impl Schema for ObjectSchema {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues> {
        let Some(object) = value.as_object() else {
            return Err(mismatch(&self.name, value));
        };

        let mut decoded = Map::new();
        let mut issues = ValidationIssues::default();

        for (field, schema) in &self.fields {
            match object.get(field) {
                None if schema.accepts_missing() => {}
                None => issues.push(ValidationIssue::new(
                    field.as_str(),
                    format!("missing required field of type {}", schema.name()),
                )),
                Some(raw) => match schema.validate(raw) {
                    Ok(v) => {
                        decoded.insert(field.clone(), v);
                    }
                    Err(e) => issues.extend(e.nested(field)),
                },
            }
        }

        for key in object.keys() {
            if self.field(key).is_none() {
                issues.push(ValidationIssue::new(key.as_str(), "unexpected field"));
            }
        }

        if issues.is_empty() {
            Ok(Value::Object(decoded))
        } else {
            Err(issues)
        }
    }
}

/// Schema that also accepts `null` and missing object fields.
#[derive(Debug, Clone)]
pub struct OptionalSchema {
    inner: SchemaRef,
}

impl Schema for OptionalSchema {
    fn name(&self) -> String {
        format!("{} | null", self.inner.name())
    }

    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            self.inner.validate(value)
        }
    }

    fn accepts_missing(&self) -> bool {
        true
    }
}

/// Schema matching one exact JSON value.
#[derive(Debug, Clone)]
pub struct LiteralSchema {
    expected: Value,
}

impl Schema for LiteralSchema {
    fn name(&self) -> String {
        self.expected.to_string()
    }

    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues> {
        if *value == self.expected {
            Ok(value.clone())
        } else {
            Err(mismatch(&self.name(), value))
        }
    }
}

/// Schema delegating to serde deserialization of `T`.
pub struct TypedSchema<T>(PhantomData<fn() -> T>);

impl<T> fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedSchema")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> Schema for TypedSchema<T> {
    fn name(&self) -> String {
        std::any::type_name::<T>().to_string()
    }

    fn validate(&self, value: &Value) -> Result<Value, ValidationIssues> {
        serde_json::from_value::<T>(value.clone())
            .map(|_| value.clone())
            .map_err(|e| ValidationIssues::single("", e.to_string()))
    }
}

pub fn string() -> SchemaRef {
    Arc::new(PrimitiveSchema(Primitive::String))
}

pub fn number() -> SchemaRef {
    Arc::new(PrimitiveSchema(Primitive::Number))
}

/// A number without a fractional part.
pub fn integer() -> SchemaRef {
    Arc::new(PrimitiveSchema(Primitive::Integer))
}

pub fn boolean() -> SchemaRef {
    Arc::new(PrimitiveSchema(Primitive::Boolean))
}

pub fn array(item: SchemaRef) -> SchemaRef {
    Arc::new(ArraySchema { item })
}

/// An anonymous object with exactly the given fields.
pub fn object<I, N>(fields: I) -> SchemaRef
where
    I: IntoIterator<Item = (N, SchemaRef)>,
    N: Into<String>,
{
    let fields = fields.into_iter().map(|(n, s)| (n.into(), s)).collect();
    Arc::new(ObjectSchema::new("object", fields))
}

pub fn optional(inner: SchemaRef) -> SchemaRef {
    Arc::new(OptionalSchema { inner })
}

pub fn literal(expected: impl Into<Value>) -> SchemaRef {
    Arc::new(LiteralSchema {
        expected: expected.into(),
    })
}

/// A schema accepting whatever deserializes into `T`.
pub fn typed<T: DeserializeOwned + 'static>() -> SchemaRef {
    Arc::new(TypedSchema::<T>(PhantomData))
}

/// Renders a scalar for use in a path, query string or header.
///
/// Strings are used verbatim, `null` becomes the empty string and every
/// other value uses its JSON text.
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &str, value: &Value) -> ValidationIssues {
    ValidationIssues::single("", format!("expected {expected}, got {}", describe(value)))
}
