//! Backend selection.

use std::sync::Arc;

use tracing::{info, warn};

use nousquest_core::config::DatabaseConfig;
use nousquest_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{PermissionRepository, UserRepository};
use crate::store::{CredentialStore, PermissionGraphStore};

/// The pair of store handles the auth layer runs on.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Credential and lockout state.
    pub credentials: Arc<dyn CredentialStore>,
    /// Role and authorization graph.
    pub permissions: Arc<dyn PermissionGraphStore>,
    /// Pool backing the stores, when PostgreSQL is selected.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Connect to the backend named by `database.url`.
    ///
    /// `memory://` selects a fresh, empty [`MemoryStore`]; anything else is
    /// treated as a PostgreSQL URL.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            warn!("Using in-memory store; data is lost on restart");
            return Ok(Self::from_memory(MemoryStore::new()));
        }

        let pool = DatabasePool::connect(config).await?;
        if config.run_migrations {
            run_migrations(pool.pool()).await?;
        }
        info!("PostgreSQL stores ready");

        Ok(Self {
            credentials: Arc::new(UserRepository::new(pool.pool().clone())),
            permissions: Arc::new(PermissionRepository::new(pool.pool().clone())),
            pool: Some(pool),
        })
    }

    /// Wrap an existing in-memory store.
    pub fn from_memory(store: MemoryStore) -> Self {
        Self {
            credentials: Arc::new(store.clone()),
            permissions: Arc::new(store),
            pool: None,
        }
    }
}
