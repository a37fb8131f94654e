//! JWT signing.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use nousquest_core::error::AppError;

use super::claims::Claims;

/// Signs claims with HMAC-SHA256.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    header: Header,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("algorithm", &self.header.alg)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates an encoder for the shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
        }
    }

    /// Serializes and signs `claims`.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
