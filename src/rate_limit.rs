// src/rate_limit.rs
//! Per-caller sliding-window request limiter.
//!
//! State lives in the limiter instance handed to the server, so it is
//! per-process. Several instances behind a load balancer each keep their own
//! window.

use crate::environment::RateLimitConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: usize,
    /// Epoch milliseconds: start of the current window plus the window length.
    pub reset_time: i64,
    /// Epoch milliseconds at which a rejected caller gets a free slot again.
    #[serde(skip)]
    pub retry_at: i64,
}

pub struct RateLimiter {
    max_requests: usize,
    window_ms: i64,
    sweep_threshold: usize,
    requests: Mutex<HashMap<String, Vec<i64>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_ms: i64) -> Self {
        Self {
            max_requests,
            window_ms,
            sweep_threshold: 1000,
            requests: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window_ms).with_sweep_threshold(config.sweep_threshold)
    }

    pub fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn tracked_identities(&self) -> usize {
        self.lock().len()
    }

    pub fn check_now(&self, identity: &str) -> RateLimitDecision {
        self.check(identity, chrono::Utc::now().timestamp_millis())
    }

    /// Admit or reject one request from `identity` at `now` (epoch ms).
    ///
    /// Rejected attempts are not recorded and do not extend the window.
    pub fn check(&self, identity: &str, now: i64) -> RateLimitDecision {
        let window_start = now - self.window_ms;
        let mut requests = self.lock();

        let history = requests.entry(identity.to_string()).or_default();
        history.retain(|&timestamp| timestamp > window_start);

        let reset_time = window_start + self.window_ms;

        if history.len() >= self.max_requests {
            let retry_at = history.first().map_or(now, |oldest| oldest + self.window_ms);
            debug!("Rate limit reached for {}", identity);
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_time,
                retry_at,
            };
        }

        history.push(now);
        let remaining = self.max_requests - history.len();

        if requests.len() > self.sweep_threshold {
            self.sweep(&mut requests, now);
        }

        RateLimitDecision {
            allowed: true,
            remaining,
            reset_time,
            retry_at: now,
        }
    }

    fn sweep(&self, requests: &mut HashMap<String, Vec<i64>>, now: i64) {
        let oldest_allowed = now - self.window_ms * 2;
        let before = requests.len();

        requests.retain(|_, history| history.iter().any(|&timestamp| timestamp >= oldest_allowed));

        debug!(
            "Rate limiter sweep removed {} of {} identities",
            before - requests.len(),
            before
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<i64>>> {
        match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Rate limiter state was poisoned; continuing with last known state");
                poisoned.into_inner()
            }
        }
    }
}
