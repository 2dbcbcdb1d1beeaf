//! Username/password verification guarded by the lockout.
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use super::lockout::LockoutGuard;
use super::password::{generate_password, hash_password_with_cost, verify_password};
use crate::error::{AppError, AuthError};
use crate::metrics::AUTH_LOGIN_FAILED;
use crate::storage::UserStore;

/// Identity established by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub username: String,
    pub authorities: Vec<String>,
}

/// The single authentication strategy: stored scrypt hash comparison
#[derive(Clone)]
pub struct CredentialVerifier<S> {
    store: S,
    lockout: LockoutGuard,
    /// Hash of a random password at the configured cost. Unknown usernames
    /// are checked against it so they cost as much as a wrong password.
    placeholder_hash: Arc<str>,
}

impl<S: UserStore> CredentialVerifier<S> {
    /// `hash_log_n` should match the cost stored passwords are hashed with.
    pub fn new(store: S, lockout: LockoutGuard, hash_log_n: u8) -> Result<Self, AppError> {
        let placeholder_hash = hash_password_with_cost(&generate_password(), hash_log_n)
            .map_err(|e| AppError::Internal(format!("placeholder hash: {e}")))?;
        Ok(Self {
            store,
            lockout,
            placeholder_hash: placeholder_hash.into(),
        })
    }

    pub fn lockout(&self) -> &LockoutGuard {
        &self.lockout
    }

    /// Check `password` for `username`.
    ///
    /// The lockout is consulted before the store or any hashing, so a locked
    /// identity is rejected cheaply. Unknown user and wrong password both
    /// come back as [`AuthError::InvalidCredentials`] after the same hashing
    /// work.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<VerifiedUser, AppError> {
        if self.lockout.is_locked(username) {
            let remaining_secs = self
                .lockout
                .remaining_lockout(username)
                .map_or(0, |d| d.as_secs());
            debug!(username, remaining_secs, code = AuthError::AccountLocked.code(), "login rejected");
            counter!(AUTH_LOGIN_FAILED, "code" => AuthError::AccountLocked.code()).increment(1);
            return Err(AuthError::AccountLocked.into());
        }

        let user = self.store.lookup_user(username).await?;

        // scrypt blocks for a while; run it off the async workers
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.placeholder_hash.to_string(),
        };
        let supplied = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&hash, &supplied)).await?;

        let Some(user) = user else {
            debug!(username, code = AuthError::InvalidCredentials.code(), "unknown user");
            counter!(AUTH_LOGIN_FAILED, "code" => AuthError::InvalidCredentials.code()).increment(1);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !matches {
            let locked = self.lockout.record_failure(username);
            info!(username, locked, code = AuthError::InvalidCredentials.code(), "wrong password");
            counter!(AUTH_LOGIN_FAILED, "code" => AuthError::InvalidCredentials.code()).increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }

        self.lockout.record_success(username);
        Ok(VerifiedUser {
            username: user.username,
            authorities: user.authorities,
        })
    }
}
