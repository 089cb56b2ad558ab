//! Sliding-window submission limiter

use axum::http::HeaderMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::RateLimitConfig;

/// Shared bucket for requests that carry no client address header.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitExceeded {
    pub retry_after: Duration,
    pub limit: usize,
}

impl RateLimitExceeded {
    /// Whole seconds, rounded up so clients never retry too early.
    pub fn retry_after_seconds(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        let rounded = if self.retry_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        };
        rounded.max(1)
    }
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_limits(config.max_submissions, config.window())
    }

    pub fn with_limits(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check_and_record(&self, identity: &str) -> Result<(), RateLimitExceeded> {
        self.check_and_record_at(identity, Instant::now())
    }

    /// Prunes expired attempts for `identity`, then either records `now` or
    /// rejects without recording. Both happen under one lock.
    pub fn check_and_record_at(&self, identity: &str, now: Instant) -> Result<(), RateLimitExceeded> {
        let mut requests = self.requests.lock();

        let entries = requests.entry(identity.to_string()).or_default();

        entries.retain(|&instant| now.saturating_duration_since(instant) < self.window);

        if entries.len() >= self.max_requests {
            let oldest = entries.first().copied().unwrap_or(now);
            let retry_after = self.window.saturating_sub(now.saturating_duration_since(oldest));

            debug!(identity, attempts = entries.len(), ?retry_after, "Rate limit exceeded");

            return Err(RateLimitExceeded {
                retry_after,
                limit: self.max_requests,
            });
        }

        entries.push(now);

        Ok(())
    }

    /// Live attempts recorded for `identity`; does not create an entry.
    pub fn current_usage(&self, identity: &str) -> usize {
        let now = Instant::now();
        self.requests
            .lock()
            .get(identity)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|&&instant| now.saturating_duration_since(instant) < self.window)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn tracked_identities(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    /// Drops identities whose attempts have all left the window.
    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let mut requests = self.requests.lock();
        let before = requests.len();

        requests.retain(|_, entries| {
            entries.retain(|&instant| now.saturating_duration_since(instant) < self.window);
            !entries.is_empty()
        });

        before - requests.len()
    }
}

/// First address of `X-Forwarded-For`, then `X-Real-IP`, then
/// [`UNKNOWN_IDENTITY`].
pub fn client_identity(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_IDENTITY)
        .to_string()
}
