//! Shared types: typed identifiers and the response envelope.

pub mod id;
pub mod response;

pub use id::{ActionId, AuthorizationId, OrgId, ResourceId, RoleId, TokenId, UserId};
pub use response::ApiEnvelope;
