//! Role-based access control graph.
//!
//! `User -> UserSecurityRole -> SecurityRole -> SecurityRoleAuthorization
//! -> Authorization -> (Resource, Action)`. Every tenant-owned edge carries
//! `org_id`; resources and actions are a global vocabulary.

pub mod grant;
pub mod permission;
pub mod role;
pub mod vocabulary;

pub use grant::{Authorization, SecurityRoleAuthorization, UserSecurityRole};
pub use permission::Permission;
pub use role::SecurityRole;
pub use vocabulary::{Action, Resource};
