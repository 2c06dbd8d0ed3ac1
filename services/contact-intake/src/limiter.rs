// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter for contact submissions.
//!
//! Each client address owns the timestamps of its requests during the
//! trailing hour. Counts are taken over the trailing minute and the trailing
//! hour relative to the time of the request:
//! 1. Per-minute ceiling (3 default)
//! 2. Per-hour ceiling (10 default)
//!
//! Rejected requests are recorded too, so a client that keeps hammering the
//! endpoint keeps its window full.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Length of the short window in milliseconds.
pub const MINUTE_MS: i64 = 60_000;

/// Length of the long window in milliseconds.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Request counts inside both windows after recording a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounts {
    pub per_minute: u32,
    pub per_hour: u32,
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed { counts: WindowCounts },
    /// Request is rate limited
    Limited {
        /// Which ceiling was crossed
        reason: RateLimitReason,
        /// Time until a new request would fit
        retry_after: Duration,
        counts: WindowCounts,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    pub fn counts(&self) -> WindowCounts {
        match self {
            Self::Allowed { counts } | Self::Limited { counts, .. } => *counts,
        }
    }
}

/// Reason for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitReason {
    /// More than the per-minute ceiling in the trailing 60 seconds
    MinuteWindowExceeded,
    /// More than the per-hour ceiling in the trailing 3600 seconds
    HourWindowExceeded,
}

impl std::fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinuteWindowExceeded => write!(f, "Per-minute submission limit exceeded"),
            Self::HourWindowExceeded => write!(f, "Per-hour submission limit exceeded"),
        }
    }
}

/// Timestamps (ms since epoch) of one client's requests, oldest first.
#[derive(Debug, Default)]
struct Bucket {
    hits: Vec<i64>,
}

impl Bucket {
    /// Prune to the trailing hour, append `now` and count both windows.
    fn record(&mut self, now_ms: i64) -> WindowCounts {
        let hour_floor = now_ms - HOUR_MS;
        self.hits.retain(|&t| t > hour_floor);
        self.hits.push(now_ms);

        let minute_floor = now_ms - MINUTE_MS;
        let per_minute = self.hits.iter().filter(|&&t| t > minute_floor).count();

        WindowCounts {
            per_minute: saturating_u32(per_minute),
            per_hour: saturating_u32(self.hits.len()),
        }
    }

    /// Time until at most `limit - 1` hits remain inside `window_ms`,
    /// i.e. until one more request would be within the ceiling.
    fn retry_after(&self, now_ms: i64, window_ms: i64, limit: u32) -> Duration {
        let limit = limit as usize;
        if limit == 0 || self.hits.len() < limit {
            return Duration::ZERO;
        }
        let blocking = self.hits[self.hits.len() - limit];
        let wait_ms = (blocking + window_ms - now_ms).max(0);
        Duration::from_millis(wait_ms as u64)
    }

    fn newest(&self) -> Option<i64> {
        self.hits.last().copied()
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Thread-safe sliding-window rate limiter.
///
/// All mutations go through one write lock, so concurrent requests from the
/// same client never lose an increment.
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Arc<RwLock<HashMap<String, Bucket>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record a request at `now_ms` and return the resulting window counts.
    pub async fn track(&self, client_id: &str, now_ms: i64) -> WindowCounts {
        let mut buckets = self.buckets.write().await;
        buckets
            .entry(client_id.to_string())
            .or_default()
            .record(now_ms)
    }

    /// Record a request now and apply the configured ceilings.
    pub async fn check(&self, client_id: &str) -> RateLimitResult {
        self.check_at(client_id, now_millis()).await
    }

    /// Record a request at `now_ms` and apply the configured ceilings.
    pub async fn check_at(&self, client_id: &str, now_ms: i64) -> RateLimitResult {
        let mut buckets = self.buckets.write().await;
        let bucket = buckets.entry(client_id.to_string()).or_default();
        let counts = bucket.record(now_ms);

        let minute_exceeded = counts.per_minute > self.config.max_per_minute;
        let hour_exceeded = counts.per_hour > self.config.max_per_hour;

        if !minute_exceeded && !hour_exceeded {
            return RateLimitResult::Allowed { counts };
        }

        let minute_wait = if minute_exceeded {
            bucket.retry_after(now_ms, MINUTE_MS, self.config.max_per_minute)
        } else {
            Duration::ZERO
        };
        let hour_wait = if hour_exceeded {
            bucket.retry_after(now_ms, HOUR_MS, self.config.max_per_hour)
        } else {
            Duration::ZERO
        };

        let reason = if minute_exceeded {
            RateLimitReason::MinuteWindowExceeded
        } else {
            RateLimitReason::HourWindowExceeded
        };
        let retry_after = minute_wait.max(hour_wait);

        debug!(
            client = %client_id,
            per_minute = counts.per_minute,
            per_hour = counts.per_hour,
            ?retry_after,
            "Client over submission limit"
        );

        RateLimitResult::Limited {
            reason,
            retry_after,
            counts,
        }
    }

    /// Drop buckets whose every timestamp has left the hour window.
    pub async fn cleanup(&self) {
        self.cleanup_at(now_millis()).await;
    }

    /// Drop buckets that would be pruned to empty at `now_ms`.
    pub async fn cleanup_at(&self, now_ms: i64) {
        let hour_floor = now_ms - HOUR_MS;
        let mut buckets = self.buckets.write().await;
        let before = buckets.len();
        buckets.retain(|_, bucket| bucket.newest().is_some_and(|t| t > hour_floor));
        let evicted = before - buckets.len();
        if evicted > 0 {
            debug!(evicted, remaining = buckets.len(), "Evicted idle rate limit buckets");
        }
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.read().await.len()
    }
}

/// Wall clock in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
