// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for abuse simulation results.

use contact_intake::{Accepted, SubmissionError};
use std::collections::HashMap;

/// Collects outcomes during an abuse simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Count of requests by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of requests by client
    requests_per_client: HashMap<String, usize>,
}

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Delivered,
    Logged,
    Discarded,
    RateLimited,
    InvalidPayload,
    InvalidFields,
    VerificationFailed,
    DispatchFailed,
}

impl From<&Result<Accepted, SubmissionError>> for Outcome {
    fn from(result: &Result<Accepted, SubmissionError>) -> Self {
        match result {
            Ok(Accepted::Delivered) => Self::Delivered,
            Ok(Accepted::Logged) => Self::Logged,
            Ok(Accepted::Discarded) => Self::Discarded,
            Err(SubmissionError::TooManyRequests { .. }) => Self::RateLimited,
            Err(SubmissionError::InvalidPayload) => Self::InvalidPayload,
            Err(SubmissionError::MissingOrInvalidFields(_)) => Self::InvalidFields,
            Err(SubmissionError::VerificationFailed) => Self::VerificationFailed,
            Err(SubmissionError::DispatchFailed(_)) => Self::DispatchFailed,
        }
    }
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_client.entry(client.to_string()).or_insert(0) += 1;
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Requests that looked successful to the caller.
    pub fn accepted(&self) -> usize {
        self.count(Outcome::Delivered) + self.count(Outcome::Logged) + self.count(Outcome::Discarded)
    }

    /// Get block rate (ratio of rejected to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.accepted()) as f64 / total as f64
    }

    /// Get number of unique clients that made requests.
    pub fn unique_clients(&self) -> usize {
        self.requests_per_client.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            delivered: self.count(Outcome::Delivered),
            logged: self.count(Outcome::Logged),
            discarded: self.count(Outcome::Discarded),
            rate_limited: self.count(Outcome::RateLimited),
            rejected_input: self.count(Outcome::InvalidPayload)
                + self.count(Outcome::InvalidFields),
            verification_failed: self.count(Outcome::VerificationFailed),
            block_rate: self.block_rate(),
            unique_clients: self.unique_clients(),
        }
    }
}

/// Summary report of simulation metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub delivered: usize,
    pub logged: usize,
    pub discarded: usize,
    pub rate_limited: usize,
    pub rejected_input: usize,
    pub verification_failed: usize,
    pub block_rate: f64,
    pub unique_clients: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Abuse Simulation Report ===")?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Delivered:         {}", self.delivered)?;
        writeln!(f, "Logged:            {}", self.logged)?;
        writeln!(f, "Discarded (bot):   {}", self.discarded)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Rejected Input:    {}", self.rejected_input)?;
        writeln!(f, "Verification Fail: {}", self.verification_failed)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Unique Clients:    {}", self.unique_clients)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();

        metrics.record(Outcome::Logged, "10.0.0.1");
        metrics.record(Outcome::Discarded, "10.0.0.2");
        metrics.record(Outcome::RateLimited, "10.0.0.1");

        assert_eq!(metrics.total_requests(), 3);
        assert_eq!(metrics.accepted(), 2);
        assert_eq!(metrics.count(Outcome::RateLimited), 1);
        assert_eq!(metrics.unique_clients(), 2);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Logged, "10.0.0.1");
        }
        for _ in 0..7 {
            metrics.record(Outcome::RateLimited, "10.0.0.1");
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
