//! Path templating for endpoint definitions.
//!
//! An endpoint's path is produced by a developer-supplied function over the
//! declared `Params`. [`PathTemplate`] wraps that function so every path it
//! produces carries exactly one leading `/`, whether it was rendered from real
//! values or from placeholders.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::schema::render_scalar;

/// The parameter values a path function reads from.
#[derive(Debug, Clone, Default)]
pub struct PathParams<'a> {
    values: Cow<'a, Map<String, Value>>,
}

impl PathParams<'static> {
    /// Parameters for endpoints that declare no `Params`.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl<'a> PathParams<'a> {
    pub fn borrowed(values: &'a Map<String, Value>) -> Self {
        Self {
            values: Cow::Borrowed(values),
        }
    }

    /// The rendered value of `name`, or an empty string when absent.
    pub fn get(&self, name: &str) -> String {
        self.values.get(name).map(render_scalar).unwrap_or_default()
    }

    /// The raw value of `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for PathParams<'static> {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values: Cow::Owned(values),
        }
    }
}

/// A path-construction function.
pub type PathFn = Arc<dyn Fn(&PathParams<'_>) -> String + Send + Sync>;

/// Prefixes `path` with `/` unless it already starts with one.
///
/// ```
/// use endpoint_define::path::ensure_leading_slash;
///
/// assert_eq!(ensure_leading_slash("users"), "/users");
/// assert_eq!(ensure_leading_slash("/users"), "/users");
/// ```
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// A path function with leading-separator normalization.
#[derive(Clone)]
pub struct PathTemplate {
    build: PathFn,
}

impl PathTemplate {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&PathParams<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
        }
    }

    /// Renders the path from concrete parameter values.
    pub fn render(&self, params: &PathParams<'_>) -> String {
        ensure_leading_slash(&(self.build)(params))
    }

    /// Renders the path with every named parameter replaced by `format(name)`.
    pub fn render_static<'n, I, F>(&self, names: I, format: F) -> String
    where
        I: IntoIterator<Item = &'n str>,
        F: Fn(&str) -> String,
    {
        let placeholders: Map<String, Value> = names
            .into_iter()
            .map(|name| (name.to_string(), Value::String(format(name))))
            .collect();
        self.render(&PathParams::from(placeholders))
    }

    /// Calls the wrapped function without normalization.
    pub fn raw(&self, params: &PathParams<'_>) -> String {
        (self.build)(params)
    }
}

impl fmt::Debug for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTemplate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn crayons() -> PathTemplate {
        PathTemplate::new(|p| format!("users/{}/crayons", p.get("id")))
    }

    #[test]
    fn render_adds_single_slash() {
        let params = json!({ "id": "id" });
        let params = PathParams::borrowed(params.as_object().unwrap());
        assert_eq!(crayons().render(&params), "/users/id/crayons");
    }

    #[test]
    fn render_keeps_existing_slash() {
        let template = PathTemplate::new(|_| "/users".to_string());
        assert_eq!(template.render(&PathParams::empty()), "/users");
    }

    #[test]
    fn numbers_render_without_quotes() {
        let template =
            PathTemplate::new(|p| format!("users/{}/crayons/{}", p.get("id"), p.get("crayonSet")));
        let params: Map<String, Value> = json!({ "id": 12, "crayonSet": 4 })
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(
            template.render(&PathParams::from(params)),
            "/users/12/crayons/4"
        );
    }

    #[test]
    fn static_render_uses_formatter() {
        let path = crayons().render_static(["id"], |name| format!(":{name}"));
        assert_eq!(path, "/users/:id/crayons");

        let path = crayons().render_static(["id"], |name| format!("{{{name}}}"));
        assert_eq!(path, "/users/{id}/crayons");
    }

    #[test]
    fn missing_params_render_empty() {
        assert_eq!(crayons().render(&PathParams::empty()), "/users//crayons");
    }

    #[test]
    fn leading_slash_is_idempotent() {
        let once = ensure_leading_slash("a/b");
        assert_eq!(ensure_leading_slash(&once), once);
        assert_eq!(ensure_leading_slash(""), "/");
    }
}
