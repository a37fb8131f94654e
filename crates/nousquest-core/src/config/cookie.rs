//! Session cookie configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// `SameSite` policy applied to session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSitePolicy {
    /// Only same-site requests carry the cookie.
    Strict,
    /// Top-level navigations also carry the cookie.
    Lax,
    /// Cross-site requests carry the cookie; requires `secure`.
    None,
}

/// Attributes for the access and refresh cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Name of the access token cookie.
    #[serde(default = "default_access_name")]
    pub access_name: String,
    /// Name of the refresh token cookie.
    #[serde(default = "default_refresh_name")]
    pub refresh_name: String,
    /// Path the access cookie is scoped to.
    #[serde(default = "default_access_path")]
    pub access_path: String,
    /// Path the refresh cookie is scoped to.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Send cookies over HTTPS only. Disable only for local development.
    #[serde(default = "default_secure")]
    pub secure: bool,
    /// `SameSite` policy.
    #[serde(default = "default_same_site")]
    pub same_site: SameSitePolicy,
}

impl CookieConfig {
    /// Validate attribute combinations browsers would reject.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.same_site == SameSitePolicy::None && !self.secure {
            return Err(AppError::configuration(
                "cookie.same_site = \"None\" requires cookie.secure = true",
            ));
        }
        if self.access_name == self.refresh_name {
            return Err(AppError::configuration(
                "access and refresh cookies must use different names",
            ));
        }
        Ok(())
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_name: default_access_name(),
            refresh_name: default_refresh_name(),
            access_path: default_access_path(),
            refresh_path: default_refresh_path(),
            secure: default_secure(),
            same_site: default_same_site(),
        }
    }
}

fn default_access_name() -> String {
    "access_token".to_string()
}

fn default_refresh_name() -> String {
    "refresh_token".to_string()
}

fn default_access_path() -> String {
    "/api".to_string()
}

fn default_refresh_path() -> String {
    "/api/refresh".to_string()
}

fn default_secure() -> bool {
    true
}

fn default_same_site() -> SameSitePolicy {
    SameSitePolicy::Strict
}
