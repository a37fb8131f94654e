//! User accounts.

pub mod model;

pub use model::{CreateUser, User, UserSummary};
