//! # nousquest-entity
//!
//! Domain entity models for NousQuest. Every struct in this crate
//! represents a database table row or a domain value object. Tenant-owned
//! rows carry their `org_id` and are identified by the `(id, org_id)` pair.

pub mod organization;
pub mod rbac;
pub mod user;
