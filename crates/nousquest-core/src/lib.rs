//! # nousquest-core
//!
//! Core crate for NousQuest. Contains configuration schemas, typed
//! identifiers, the response envelope, and the unified error system.
//!
//! This crate has **no** internal dependencies on other NousQuest crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
