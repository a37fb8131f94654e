//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
///
/// Accepts `{identifier, secret}` and the older `{userId, password}` spelling.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address identifying the account.
    #[serde(alias = "userId")]
    #[validate(length(min = 1, max = 255, message = "Identifier is required"))]
    pub identifier: String,
    /// Plaintext secret.
    #[serde(alias = "password")]
    #[validate(length(min = 1, max = 1024, message = "Secret is required"))]
    pub secret: String,
}

/// Query for the bulk authorization map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationsQuery {
    /// Comma-separated resource names; absent means every resource.
    pub resources: Option<String>,
}

impl AuthorizationsQuery {
    /// Requested resource names, trimmed, with blanks dropped. `None` when
    /// no name remains, which means every resource.
    pub fn resource_filter(&self) -> Option<Vec<String>> {
        let names: Vec<String> = self
            .resources
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        (!names.is_empty()).then_some(names)
    }
}

/// Query for a single permission check.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PermissionCheckQuery {
    /// Resource name.
    #[validate(length(min = 1, max = 100))]
    pub resource: String,
    /// Action name.
    #[validate(length(min = 1, max = 100))]
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_accepts_legacy_field_names() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"userId":"student@email.com","password":"123"}"#).unwrap();
        assert_eq!(req.identifier, "student@email.com");
        assert_eq!(req.secret, "123");
    }

    #[test]
    fn test_empty_secret_fails_validation() {
        let req = LoginRequest {
            identifier: "student@email.com".to_string(),
            secret: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_resource_filter() {
        let q = AuthorizationsQuery {
            resources: Some("quiz, class,,".to_string()),
        };
        assert_eq!(
            q.resource_filter(),
            Some(vec!["quiz".to_string(), "class".to_string()])
        );
        assert_eq!(AuthorizationsQuery::default().resource_filter(), None);
    }

    #[test]
    fn test_blank_resource_filter_means_all() {
        for raw in ["", ",", " , ,"] {
            let q = AuthorizationsQuery {
                resources: Some(raw.to_string()),
            };
            assert_eq!(q.resource_filter(), None, "resources={raw:?}");
        }
    }
}
