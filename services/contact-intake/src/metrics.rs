// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for submission outcomes.

use crate::error::SubmissionError;
use crate::pipeline::Accepted;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

const ACCEPTED_LABEL: &str = "accepted";

/// Service metrics, registered on a private registry.
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    newsletter_signups: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new(
                "contact_submissions_total",
                "Contact form submissions by terminal outcome",
            ),
            &["outcome"],
        )?;
        let newsletter_signups = IntCounter::new(
            "newsletter_signups_total",
            "Newsletter signup requests received",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(newsletter_signups.clone()))?;

        Ok(Self {
            registry,
            submissions,
            newsletter_signups,
        })
    }

    /// Count one contact submission under its outcome label.
    ///
    /// Every `Accepted` variant shares the `accepted` label so a scrape
    /// cannot tell a honeypot catch from a real submission.
    pub fn record_submission(&self, outcome: &Result<Accepted, SubmissionError>) {
        let label = match outcome {
            Ok(_) => ACCEPTED_LABEL,
            Err(err) => outcome_label(err),
        };
        self.submissions.with_label_values(&[label]).inc();
    }

    pub fn record_newsletter_signup(&self) {
        self.newsletter_signups.inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn outcome_label(err: &SubmissionError) -> &'static str {
    match err {
        SubmissionError::TooManyRequests { .. } => "rate_limited",
        SubmissionError::InvalidPayload => "invalid_payload",
        SubmissionError::MissingOrInvalidFields(_) => "invalid_fields",
        SubmissionError::VerificationFailed => "verification_failed",
        SubmissionError::DispatchFailed(_) => "dispatch_failed",
    }
}
