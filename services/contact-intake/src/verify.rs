// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Human verification against Cloudflare Turnstile.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure to obtain an answer from the verification service.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Verification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Verification service returned status {0}")]
    Status(u16),
}

/// Something that can decide whether a client token came from a human.
#[async_trait]
pub trait HumanVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<bool, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Turnstile siteverify client.
pub struct TurnstileVerifier {
    endpoint: String,
    secret: String,
    client: reqwest::Client,
}

impl TurnstileVerifier {
    /// Create a verifier whose calls are bounded by `timeout`.
    pub fn new(endpoint: String, secret: String, timeout: Duration) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            secret,
            client,
        })
    }
}

#[async_trait]
impl HumanVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> Result<bool, VerifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VerifyError::Status(response.status().as_u16()));
        }

        let body: SiteverifyResponse = response.json().await?;
        if !body.success {
            debug!(error_codes = ?body.error_codes, "Turnstile rejected token");
        }
        Ok(body.success)
    }
}
