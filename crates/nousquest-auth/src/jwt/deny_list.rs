//! Process-local token deny-list.
//!
//! Entries live exactly as long as the token they revoke would have, so
//! the list never outgrows the set of still-valid revoked tokens. There is
//! no capacity bound: evicting an entry early would make its token valid
//! again. The list is not shared between processes.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use nousquest_core::types::TokenId;

/// Evicts each entry at the instant stored as its value.
struct UntilTokenExpiry;

impl Expiry<TokenId, Instant> for UntilTokenExpiry {
    fn expire_after_create(
        &self,
        _key: &TokenId,
        value: &Instant,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(value.saturating_duration_since(created_at))
    }
}

/// Revoked token ids, keyed by `jti`.
#[derive(Clone)]
pub struct TokenDenyList {
    cache: Cache<TokenId, Instant>,
}

impl std::fmt::Debug for TokenDenyList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDenyList")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl TokenDenyList {
    /// Creates an empty deny-list.
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .expire_after(UntilTokenExpiry)
                .build(),
        }
    }

    /// Revoke `jti` until `expires_at`. Already-expired tokens are skipped.
    pub async fn deny(&self, jti: TokenId, expires_at: DateTime<Utc>) {
        let Ok(remaining) = (expires_at - Utc::now()).to_std() else {
            return;
        };
        if remaining.is_zero() {
            return;
        }
        debug!(jti = %jti, remaining_secs = remaining.as_secs(), "Token revoked");
        self.cache.insert(jti, Instant::now() + remaining).await;
    }

    /// Whether `jti` has been revoked.
    pub fn is_denied(&self, jti: &TokenId) -> bool {
        self.cache.contains_key(jti)
    }
}

impl Default for TokenDenyList {
    fn default() -> Self {
        Self::new()
    }
}
