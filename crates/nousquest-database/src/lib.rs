//! # nousquest-database
//!
//! Storage for credentials and the permission graph. The auth layer only
//! sees the [`CredentialStore`] and [`PermissionGraphStore`] traits; this
//! crate provides a PostgreSQL implementation and an in-process one.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{CredentialStore, FailedAttempt, PermissionGraphStore};
pub use stores::Stores;
