// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse simulation patterns for security testing.
//!
//! Requests run against a simulated clock so window behaviour can be
//! checked without sleeping.

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Simulated gap between consecutive requests in milliseconds
    pub interval_ms: i64,
    /// Number of unique client addresses to rotate through
    pub unique_clients: usize,
    /// Share of requests that fill the honeypot (0.0-1.0)
    pub bot_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval_ms: 100,
            unique_clients: 1,
            bot_ratio: 0.0,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single client flood - one address submitting as fast as it can.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            interval_ms: 10,
            unique_clients: 1,
            ..Default::default()
        }
    }

    /// Distributed attack - many addresses, each sending a few requests.
    pub fn distributed_attack() -> Self {
        Self {
            total_requests: 500,
            interval_ms: 20,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Form-filling bots that fill every field including the honeypot.
    pub fn honeypot_bots() -> Self {
        Self {
            total_requests: 50,
            interval_ms: 1000,
            unique_clients: 50,
            bot_ratio: 1.0,
        }
    }

    /// Slow drip - one address staying under both windows.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 10,
            // 6 minutes apart: 10 fit in the hour
            interval_ms: 6 * 60_000,
            unique_clients: 1,
            ..Default::default()
        }
    }

    /// Mixed traffic: half bots spread across a handful of addresses.
    pub fn mixed_traffic() -> Self {
        Self {
            total_requests: 40,
            interval_ms: 30_000,
            unique_clients: 4,
            bot_ratio: 0.5,
        }
    }
}

/// Simple deterministic "random" based on index and ratio.
pub fn rand_bool(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}
