//! The fixed set of HTTP verbs an endpoint can be declared with.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// HTTP verb of an endpoint.
///
/// Only `POST`, `PUT` and `PATCH` are mutating verbs; they are the only
/// methods allowed to declare a request body.
///
/// ## Examples
///
/// ```
/// use endpoint_define::RestMethod;
///
/// let method: RestMethod = "PATCH".parse().unwrap();
/// assert!(method.has_body());
/// assert_eq!(RestMethod::Get.as_str(), "GET");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// Query the communication options of a resource.
    Options,
    /// Like GET, without a response body.
    Head,
    /// Read a resource.
    Get,
    /// Create a resource or trigger an action.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
}

impl RestMethod {
    /// Returns `true` for the mutating verbs, which carry a request body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns `true` for verbs that never change server state.
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }

    /// Uppercase wire name of the verb.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
