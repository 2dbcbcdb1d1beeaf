//! Logged-out tokens.
//!
//! A revoked token stays cryptographically valid until it expires, so the
//! request gate consults this registry before anything else. Entries carry
//! the token's own expiry so they can be dropped once it has passed.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use metrics::counter;

use super::token::peek_expiry;
use crate::metrics::AUTH_TOKEN_REVOKED;

#[derive(Debug, Clone, Default)]
pub struct RevocationRegistry {
    /// token -> encoded expiry, when one could be read
    revoked: Arc<DashMap<String, Option<i64>>>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `token`. Revoking twice is the same as once.
    pub fn revoke(&self, token: &str) {
        if self.revoked.contains_key(token) {
            return;
        }
        let expiry = peek_expiry(token);
        if self.revoked.insert(token.to_string(), expiry).is_none() {
            counter!(AUTH_TOKEN_REVOKED).increment(1);
        }
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.revoked.contains_key(token)
    }

    /// Drop entries whose encoded expiry is at or before `now` (Unix
    /// seconds). Entries without a readable expiry are kept.
    pub fn prune_expired(&self, now: i64) -> usize {
        let before = self.revoked.len();
        self.revoked
            .retain(|_, expiry| expiry.map_or(true, |exp| exp > now));
        before.saturating_sub(self.revoked.len())
    }

    /// [`prune_expired`](Self::prune_expired) against the current time
    pub fn prune(&self) -> usize {
        self.prune_expired(Utc::now().timestamp())
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}
