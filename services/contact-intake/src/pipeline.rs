// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission pipeline.
//!
//! One linear pass per request, no retries:
//!
//! 1. rate check per client address
//! 2. JSON decode
//! 3. honeypot (fake success for bots)
//! 4. field validation
//! 5. Turnstile verification, when a secret is configured
//! 6. email dispatch, or a log line when no provider is configured

use crate::config::{Config, MailConfig};
use crate::error::SubmissionError;
use crate::limiter::{now_millis, RateLimitResult, RateLimiter};
use crate::mailer::{MailError, Mailer, OutboundEmail, ResendMailer};
use crate::submission::Submission;
use crate::validator::SubmissionValidator;
use crate::verify::{HumanVerifier, TurnstileVerifier, VerifyError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How an accepted submission was handled.
///
/// All variants produce the same response and the same metrics label; the
/// distinction exists for logs and tests only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    /// Sent through the email provider
    Delivered,
    /// No provider configured; written to the log
    Logged,
    /// Honeypot filled; dropped without side effects
    Discarded,
}

/// Errors building the outbound clients at startup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to build verification client: {0}")]
    Verifier(#[from] VerifyError),

    #[error("Failed to build email client: {0}")]
    Mailer(#[from] MailError),
}

/// Sender and recipients of notification emails.
#[derive(Debug, Clone)]
struct Envelope {
    from: String,
    to: Vec<String>,
    subject: String,
}

impl From<&MailConfig> for Envelope {
    fn from(config: &MailConfig) -> Self {
        Self {
            from: config.from.clone(),
            to: config.to.clone(),
            subject: config.subject.clone(),
        }
    }
}

/// Validates, de-spams and dispatches contact submissions.
pub struct ContactPipeline {
    limiter: RateLimiter,
    validator: SubmissionValidator,
    verifier: Option<Arc<dyn HumanVerifier>>,
    mailer: Option<Arc<dyn Mailer>>,
    envelope: Envelope,
}

impl ContactPipeline {
    /// Pipeline in demo mode: no verification, submissions only logged.
    pub fn new(limiter: RateLimiter, validator: SubmissionValidator, mail: &MailConfig) -> Self {
        Self {
            limiter,
            validator,
            verifier: None,
            mailer: None,
            envelope: Envelope::from(mail),
        }
    }

    /// Require a verified token on every submission.
    pub fn with_verifier(mut self, verifier: Arc<dyn HumanVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Send accepted submissions through `mailer`.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Wire the pipeline from configuration, enabling Turnstile and Resend
    /// only when their credentials are present.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let mut pipeline = Self::new(
            RateLimiter::new(config.rate_limit.clone()),
            SubmissionValidator::new(config.validation.clone()),
            &config.mail,
        );

        if let Some(secret) = &config.verification.secret {
            let verifier = TurnstileVerifier::new(
                config.verification.endpoint.clone(),
                secret.clone(),
                config.outbound_timeout(),
            )?;
            pipeline = pipeline.with_verifier(Arc::new(verifier));
        }

        if let Some(api_key) = &config.mail.api_key {
            let mailer = ResendMailer::new(
                config.mail.endpoint.clone(),
                api_key.clone(),
                config.outbound_timeout(),
            )?;
            pipeline = pipeline.with_mailer(Arc::new(mailer));
        }

        Ok(pipeline)
    }

    pub fn verification_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    pub fn dispatch_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Process one request body from `client_id`.
    pub async fn process(&self, client_id: &str, body: &[u8]) -> Result<Accepted, SubmissionError> {
        self.process_at(client_id, body, now_millis()).await
    }

    /// Process one request body from `client_id` received at `now_ms`.
    pub async fn process_at(
        &self,
        client_id: &str,
        body: &[u8],
        now_ms: i64,
    ) -> Result<Accepted, SubmissionError> {
        if let RateLimitResult::Limited {
            reason,
            retry_after,
            counts,
        } = self.limiter.check_at(client_id, now_ms).await
        {
            info!(
                client = %client_id,
                %reason,
                per_minute = counts.per_minute,
                per_hour = counts.per_hour,
                "Submission rate limited"
            );
            return Err(SubmissionError::TooManyRequests {
                reason,
                retry_after,
            });
        }

        let submission = Submission::from_json(body).map_err(|err| {
            debug!(client = %client_id, error = %err, "Undecodable submission body");
            SubmissionError::InvalidPayload
        })?;

        if submission.is_bot() {
            info!(client = %client_id, "Honeypot filled, discarding submission");
            return Ok(Accepted::Discarded);
        }

        let submission = submission.normalized();

        if let Err(err) = self.validator.validate(&submission) {
            info!(client = %client_id, error = %err, "Submission failed validation");
            return Err(SubmissionError::MissingOrInvalidFields(err));
        }

        self.verify(client_id, &submission).await?;
        self.dispatch(&submission).await
    }

    async fn verify(&self, client_id: &str, submission: &Submission) -> Result<(), SubmissionError> {
        let Some(verifier) = &self.verifier else {
            debug!("No Turnstile secret configured, skipping verification");
            return Ok(());
        };

        let Some(token) = submission.turnstile_token.as_deref() else {
            info!(client = %client_id, "Submission without Turnstile token");
            return Err(SubmissionError::VerificationFailed);
        };

        match verifier.verify(token).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                info!(client = %client_id, "Turnstile token rejected");
                Err(SubmissionError::VerificationFailed)
            }
            Err(err) => {
                warn!(client = %client_id, error = %err, "Turnstile verification unavailable");
                Err(SubmissionError::VerificationFailed)
            }
        }
    }

    async fn dispatch(&self, submission: &Submission) -> Result<Accepted, SubmissionError> {
        let Some(mailer) = &self.mailer else {
            info!(
                name = %submission.name,
                company = %submission.company,
                email = %submission.email,
                phone = ?submission.phone,
                topic = %submission.topic,
                body = %submission.message,
                "Contact submission (no email provider configured)"
            );
            return Ok(Accepted::Logged);
        };

        let email = OutboundEmail {
            from: self.envelope.from.clone(),
            to: self.envelope.to.clone(),
            subject: self.envelope.subject.clone(),
            html: submission.render_email_html(),
        };

        match mailer.send(&email).await {
            Ok(()) => {
                info!(email = %submission.email, topic = %submission.topic, "Contact submission delivered");
                Ok(Accepted::Delivered)
            }
            Err(err) => {
                warn!(error = %err, "Email provider failed");
                Err(SubmissionError::DispatchFailed(err.to_string()))
            }
        }
    }
}
