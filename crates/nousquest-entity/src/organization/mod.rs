//! Tenant organizations.

pub mod model;

pub use model::Organization;
