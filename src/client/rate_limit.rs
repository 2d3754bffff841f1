//! API quota state reported by reddit on every response.

use log::debug;
use reqwest::header::HeaderMap;
use std::sync::{Mutex, PoisonError};

pub const RESET_HEADER: &str = "x-ratelimit-reset";
pub const USED_HEADER: &str = "x-ratelimit-used";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Snapshot of the three rate-limit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateLimit {
    /// Seconds until the quota window resets.
    pub reset_seconds: f64,
    /// Calls used in the current window.
    pub used: f64,
    /// Calls remaining in the current window.
    pub remaining: f64,
}

impl RateLimit {
    /// Read the counters from response headers.
    ///
    /// A header that is missing or not numeric yields zero for its counter.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            reset_seconds: numeric_header(headers, RESET_HEADER),
            used: numeric_header(headers, USED_HEADER),
            remaining: numeric_header(headers, REMAINING_HEADER),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.used > 0.0 && self.remaining <= 0.0
    }
}

fn numeric_header(headers: &HeaderMap, name: &str) -> f64 {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Rate-limit counters owned by a session.
///
/// The whole triple is replaced under one lock, so concurrent completions
/// never leave a mix of two responses' values. The last completion to run
/// wins.
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    state: Mutex<RateLimit>,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the counters from a response's headers.
    pub fn update(&self, headers: &HeaderMap) -> RateLimit {
        let next = RateLimit::from_headers(headers);
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        debug!(
            "Rate limit: reset in {}s, used {}, remaining {}",
            next.reset_seconds, next.used, next.remaining
        );
        next
    }

    pub fn current(&self) -> RateLimit {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
