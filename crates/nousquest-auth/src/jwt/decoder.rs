//! JWT verification and revocation checks.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use nousquest_core::error::AppError;
use nousquest_core::types::TokenId;

use super::claims::{Claims, TokenType};
use super::deny_list::TokenDenyList;

/// Validates JWTs and checks the deny-list.
///
/// Only HS256 is accepted; a token whose header names any other algorithm
/// (including `none`) is rejected before its signature is looked at.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    deny_list: TokenDenyList,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder for the shared secret.
    pub fn new(secret: &str, deny_list: TokenDenyList) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            deny_list,
        }
    }

    /// Decodes and validates an access token.
    pub async fn decode_access(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_typed(token, TokenType::Access).await
    }

    /// Decodes and validates a refresh token.
    pub async fn decode_refresh(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_typed(token, TokenType::Refresh).await
    }

    /// Revoke a token for the rest of its lifetime.
    pub async fn revoke(&self, jti: TokenId, expires_at: DateTime<Utc>) {
        self.deny_list.deny(jti, expires_at).await;
    }

    async fn decode_typed(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != expected {
            debug!(expected = ?expected, actual = ?claims.token_type, "Token type mismatch");
            return Err(AppError::authentication("Invalid token type"));
        }

        if self.deny_list.is_denied(&claims.jti) {
            debug!(jti = %claims.jti, "Rejected revoked token");
            return Err(AppError::authentication("Token has been revoked"));
        }

        Ok(claims)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                        AppError::authentication("Unsupported token algorithm")
                    }
                    _ => AppError::authentication("Invalid token"),
                }
            })?;

        Ok(token_data.claims)
    }
}
