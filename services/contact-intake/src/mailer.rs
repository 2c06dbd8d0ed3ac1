// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound email through the Resend HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Email dispatch errors.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider rejected message ({status}): {message}")]
    Provider { status: u16, message: String },
}

/// A rendered notification ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Transactional email capability.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Error object returned by Resend.
#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ProviderError {
    fn summary(&self) -> String {
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => format!("{name}: {message}"),
            (None, Some(message)) => message.clone(),
            (Some(name), None) => name.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Resend client.
pub struct ResendMailer {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl ResendMailer {
    /// Create a mailer whose calls are bounded by `timeout`.
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MailError::Provider {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        // Resend can answer 2xx and still report an error object
        if let Some(message) = reply_error(&body) {
            return Err(MailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Best-effort summary of a provider error body.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ProviderError>(body) {
        Ok(error) if error.message.is_some() => error.summary(),
        _ => body.chars().take(200).collect(),
    }
}

/// The `error` member of a success reply, if the provider set one.
fn reply_error(body: &str) -> Option<String> {
    let reply: serde_json::Value = serde_json::from_str(body).ok()?;
    match reply.get("error")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(message) => Some(message.clone()),
        error => Some(
            serde_json::from_value::<ProviderError>(error.clone())
                .ok()
                .filter(|e| e.message.is_some())
                .map(|e| e.summary())
                .unwrap_or_else(|| error.to_string()),
        ),
    }
}
