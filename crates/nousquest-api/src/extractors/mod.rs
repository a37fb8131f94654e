//! Custom Axum extractors.

pub mod session;
pub mod validated;

pub use session::AuthSession;
pub use validated::ValidatedJson;
