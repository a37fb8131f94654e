//! Request handlers.

pub mod auth;
pub mod authorization;
pub mod health;
