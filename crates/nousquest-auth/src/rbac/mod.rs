//! Tenant-isolated permission resolution.
//!
//! The store is the source of truth. Access tokens also carry a snapshot
//! of the holder's permissions; answering from that snapshot avoids a
//! store round-trip but keeps honoring a grant for up to one access-token
//! lifetime after it is revoked. The snapshot path is used only when
//! `auth.trust_token_claims` is enabled.

pub mod resolver;

pub use resolver::{AuthorizationMap, PermissionResolver};
