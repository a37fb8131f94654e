//! Permission graph repository.

use async_trait::async_trait;
use sqlx::PgPool;

use nousquest_core::error::{AppError, ErrorKind};
use nousquest_core::result::AppResult;
use nousquest_core::types::{OrgId, UserId};
use nousquest_entity::rbac::Permission;

use crate::store::PermissionGraphStore;

/// Every tenant-owned leg is pinned to `$2` explicitly, not only through
/// the natural keys, so colliding names in another org never match.
const HAS_AUTHORIZATION_SQL: &str = "\
SELECT EXISTS (
    SELECT 1
    FROM users u
    JOIN user_security_roles usr
      ON usr.user_id = u.id AND usr.org_id = u.org_id AND usr.org_id = $2
    JOIN security_roles sr
      ON sr.id = usr.security_role_id AND sr.org_id = usr.org_id AND sr.org_id = $2
    JOIN security_role_authorizations sra
      ON sra.security_role_id = sr.id AND sra.org_id = sr.org_id AND sra.org_id = $2
    JOIN authorizations a
      ON a.id = sra.authorization_id AND a.org_id = sra.org_id AND a.org_id = $2
    JOIN resources r ON r.id = a.resource_id
    JOIN actions ac ON ac.id = a.action_id
    WHERE u.id = $1 AND u.org_id = $2 AND r.name = $3 AND ac.name = $4
)";

const LIST_PERMISSIONS_SQL: &str = "\
SELECT DISTINCT r.name AS resource, ac.name AS action
FROM users u
JOIN user_security_roles usr
  ON usr.user_id = u.id AND usr.org_id = u.org_id AND usr.org_id = $2
JOIN security_roles sr
  ON sr.id = usr.security_role_id AND sr.org_id = usr.org_id AND sr.org_id = $2
JOIN security_role_authorizations sra
  ON sra.security_role_id = sr.id AND sra.org_id = sr.org_id AND sra.org_id = $2
JOIN authorizations a
  ON a.id = sra.authorization_id AND a.org_id = sra.org_id AND a.org_id = $2
JOIN resources r ON r.id = a.resource_id
JOIN actions ac ON ac.id = a.action_id
WHERE u.id = $1 AND u.org_id = $2
ORDER BY r.name, ac.name";

/// Repository answering permission-graph queries with SQL joins.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionGraphStore for PermissionRepository {
    async fn has_authorization(
        &self,
        user_id: UserId,
        org_id: OrgId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(HAS_AUTHORIZATION_SQL)
            .bind(user_id)
            .bind(org_id)
            .bind(resource)
            .bind(action)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check authorization", e)
            })
    }

    async fn list_permissions(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(LIST_PERMISSIONS_SQL)
            .bind(user_id)
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list permissions", e))
    }

    async fn list_role_names(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT sr.name FROM user_security_roles usr \
             JOIN security_roles sr ON sr.id = usr.security_role_id AND sr.org_id = usr.org_id \
             WHERE usr.user_id = $1 AND usr.org_id = $2 \
             ORDER BY sr.name",
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    async fn list_resource_names(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM resources ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list resources", e))
    }
}
