//! Request-scoped session context and token refresh.

pub mod context;
pub mod refresher;

pub use context::{SessionContext, authenticate};
pub use refresher::{RefreshDecision, SessionRefresher, SkipReason, clamp_access_expiry};
