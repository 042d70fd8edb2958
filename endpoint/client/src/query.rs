//! Query string and header encoding for validated input groups.

use endpoint_define::SchemaGroup;
use endpoint_define::schema::render_scalar;
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Encodes `values` as `application/x-www-form-urlencoded`, in the order
/// the group declares its fields.
///
/// Missing and `null` fields are skipped; arrays repeat their key.
///
/// ```
/// use endpoint_client::query::encode_query;
/// use endpoint_define::{InputGroup, SchemaGroup};
/// use endpoint_define::schema::{number, string};
/// use serde_json::json;
///
/// let group = SchemaGroup::new(InputGroup::Query, [("foo", string()), ("bar", number())]).unwrap();
/// let values = json!({ "bar": 4, "foo": "fooImpl" });
/// assert_eq!(encode_query(&group, values.as_object().unwrap()), "foo=fooImpl&bar=4");
/// ```
pub fn encode_query(group: &SchemaGroup, values: &Map<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for name in group.field_names() {
        match values.get(name) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for item in items {
                    serializer.append_pair(name, &render_scalar(item));
                }
            }
            Some(value) => {
                serializer.append_pair(name, &render_scalar(value));
            }
        }
    }
    serializer.finish()
}

/// Merges per-call header values over the default headers.
///
/// Names compare case-insensitively and per-call values win. Defaults keep
/// their position; new names are appended in declaration order.
pub fn merge_headers(
    defaults: &[(String, String)],
    group: Option<&SchemaGroup>,
    values: &Map<String, Value>,
) -> Vec<(String, String)> {
    let mut merged = defaults.to_vec();
    let Some(group) = group else {
        return merged;
    };

    for name in group.field_names() {
        let Some(value) = values.get(name).filter(|v| !v.is_null()) else {
            continue;
        };
        let rendered = render_scalar(value);
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.to_string(), rendered),
            None => merged.push((name.to_string(), rendered)),
        }
    }
    merged
}
