//! Flattened `(resource, action)` permission value.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A permission as resolved for one user, by name.
///
/// This is the shape embedded in access-token claims and returned by the
/// permission listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Resource name.
    pub resource: String,
    /// Action name.
    pub action: String,
}

impl Permission {
    /// Build a permission from names.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Whether this permission matches the given names exactly.
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}
