//! Per-user limit on analysis requests
//!
//! Each analysis call reaches a paid external endpoint, so requests are
//! throttled per user id with a keyed GCRA limiter. Users whose state has
//! fully replenished are dropped from the key store every
//! [`PRUNE_INTERVAL`] checks.

use governor::{
    clock::DefaultClock,
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};

/// Checks between sweeps of idle users
pub const PRUNE_INTERVAL: u64 = 1024;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Analysis rate limiter keyed by user id
pub struct AnalysisRateLimiter {
    /// `None` when limiting is disabled (`requests_per_minute = 0`)
    limiter: Option<KeyedLimiter>,
    checks: AtomicU64,
}

impl AnalysisRateLimiter {
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(requests_per_minute)
            .map(|n| RateLimiter::keyed(Quota::per_minute(n)));

        Self {
            limiter,
            checks: AtomicU64::new(0),
        }
    }

    /// Record an attempt for `user_id`; false if over the limit
    pub fn check(&self, user_id: &str) -> bool {
        let Some(limiter) = &self.limiter else {
            return true;
        };

        let allowed = limiter.check_key(&user_id.to_string()).is_ok();

        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if checks % PRUNE_INTERVAL == 0 {
            self.prune();
        }

        allowed
    }

    /// Forget users whose quota has fully replenished
    pub fn prune(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
            tracing::debug!(tracked_users = limiter.len(), "Pruned analysis rate limiter");
        }
    }

    /// Number of users currently held in the key store
    pub fn tracked_users(&self) -> usize {
        self.limiter.as_ref().map_or(0, |l| l.len())
    }
}
