// ============================
// crates/backend-lib/src/auth/lockout.rs
// ============================
//! Failed-login lockout per username.

use dashmap::DashMap;
use metrics::counter;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::metrics::AUTH_LOCKOUT;

/// Default number of failed attempts before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default lockout duration (5 minutes)
pub const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Failure counter for one identity
#[derive(Debug, Clone, Default)]
struct FailureCounter {
    /// Consecutive failed attempts
    attempts: u32,
    /// Set when `attempts` reached the threshold; never moved afterwards
    locked_at: Option<Instant>,
}

impl FailureCounter {
    fn lock_elapsed(&self, now: Instant, duration: Duration) -> bool {
        matches!(self.locked_at, Some(at) if now.duration_since(at) >= duration)
    }
}

/// Tracks consecutive failed logins and temporarily blocks an identity
#[derive(Debug, Clone)]
pub struct LockoutGuard {
    counters: Arc<DashMap<String, FailureCounter>>,
    max_attempts: u32,
    lockout_duration: Duration,
}

impl Default for LockoutGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_DURATION)
    }
}

impl LockoutGuard {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            counters: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
        }
    }

    /// Record a failed login for `identity`.
    ///
    /// Returns `true` if the identity is locked after this failure.
    pub fn record_failure(&self, identity: &str) -> bool {
        let now = Instant::now();

        // The entry guard holds the shard lock, so concurrent failures for the
        // same identity are applied one after another.
        let mut entry = self.counters.entry(identity.to_string()).or_default();

        if entry.lock_elapsed(now, self.lockout_duration) {
            *entry = FailureCounter::default();
        }

        entry.attempts = entry.attempts.saturating_add(1);

        if entry.attempts >= self.max_attempts && entry.locked_at.is_none() {
            entry.locked_at = Some(now);
            counter!(AUTH_LOCKOUT).increment(1);
            warn!(username = identity, attempts = entry.attempts, "account locked after failed logins");
        }

        entry.locked_at.is_some()
    }

    /// Clear the failure count and any lockout for `identity`
    pub fn record_success(&self, identity: &str) {
        self.counters.remove(identity);
    }

    /// Whether `identity` is currently locked out.
    ///
    /// An elapsed lockout is dropped here, so no sweep is needed for
    /// correctness.
    pub fn is_locked(&self, identity: &str) -> bool {
        let now = Instant::now();

        let elapsed = match self.counters.get(identity) {
            Some(counter) => match counter.locked_at {
                Some(at) if now.duration_since(at) < self.lockout_duration => return true,
                Some(_) => true,
                None => false,
            },
            None => false,
        };

        if elapsed {
            self.counters
                .remove_if(identity, |_, c| c.lock_elapsed(now, self.lockout_duration));
        }

        false
    }

    /// Consecutive failures recorded for `identity`
    pub fn failure_count(&self, identity: &str) -> u32 {
        self.counters.get(identity).map_or(0, |c| c.attempts)
    }

    /// Remaining lockout time, if locked
    pub fn remaining_lockout(&self, identity: &str) -> Option<Duration> {
        let counter = self.counters.get(identity)?;
        let elapsed = counter.locked_at?.elapsed();
        self.lockout_duration.checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// Drop entries whose lockout has elapsed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.counters.len();
        self.counters
            .retain(|_, c| !c.lock_elapsed(now, self.lockout_duration));
        before.saturating_sub(self.counters.len())
    }

    /// Number of identities with a live failure counter
    pub fn tracked_count(&self) -> usize {
        self.counters.len()
    }
}
