//! Response envelope shared by every API endpoint.

use serde::{Deserialize, Serialize};

/// Uniform JSON body: `{ "data": ..., "message": ..., "status": ... }`.
///
/// `status` mirrors the HTTP status code so clients that only see the body
/// can still branch on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Response payload; `null` for errors.
    pub data: Option<T>,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
}

impl<T> ApiEnvelope<T> {
    /// Build a successful envelope carrying `data`.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            status: 200,
        }
    }

    /// Build an envelope with an explicit status and optional payload.
    pub fn with_status(data: Option<T>, message: impl Into<String>, status: u16) -> Self {
        Self {
            data,
            message: message.into(),
            status,
        }
    }
}

impl ApiEnvelope<()> {
    /// Build an error envelope. `data` is always `null`.
    pub fn error(message: impl Into<String>, status: u16) -> Self {
        Self {
            data: None,
            message: message.into(),
            status,
        }
    }
}
