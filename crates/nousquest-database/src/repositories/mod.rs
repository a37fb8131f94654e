//! PostgreSQL implementations of the storage traits.

pub mod permission;
pub mod user;

pub use permission::PermissionRepository;
pub use user::UserRepository;
