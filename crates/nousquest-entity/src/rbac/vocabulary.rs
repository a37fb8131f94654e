//! Globally shared resource and action names.

use nousquest_core::types::{ActionId, ResourceId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Something that can be acted on, e.g. `"class"` or `"quiz"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Resource identifier.
    pub id: ResourceId,
    /// Unique resource name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
}

impl Resource {
    /// Build a new resource row.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(),
            name: name.into(),
            description: None,
        }
    }
}

/// A verb applied to a resource, e.g. `"read"` or `"attempt"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Action {
    /// Action identifier.
    pub id: ActionId,
    /// Unique action name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
}

impl Action {
    /// Build a new action row.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActionId::new(),
            name: name.into(),
            description: None,
        }
    }
}
