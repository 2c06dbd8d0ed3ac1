// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact intake service.
//!
//! Every optional integration is switched on by the presence of its
//! credential: no Turnstile secret means verification is skipped, no Resend
//! key means submissions are logged instead of mailed.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address: {0}")]
    InvalidBindAddr(String),

    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },

    #[error("Rate limit {0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("At least one contact recipient is required")]
    NoRecipients,
}

/// Configuration for the contact intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Origins allowed to call the API from a browser
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Timeout applied to every outbound call in milliseconds (default: 5000)
    #[serde(default = "default_outbound_timeout_ms")]
    pub outbound_timeout_ms: u64,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub verification: VerificationConfig,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding-window ceilings applied per client address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions in the trailing minute (default: 3)
    #[serde(default = "default_max_per_minute")]
    pub max_per_minute: u32,

    /// Maximum submissions in the trailing hour (default: 10)
    #[serde(default = "default_max_per_hour")]
    pub max_per_hour: u32,
}

/// Field limits for contact submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum length of name, company, email and phone (default: 256)
    #[serde(default = "default_max_field_len")]
    pub max_field_len: usize,

    /// Maximum length of the message body (default: 5000)
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

/// Turnstile human-verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Server-side secret; verification is skipped when unset
    #[serde(default)]
    pub secret: Option<String>,

    /// Public site key handed to the browser widget
    #[serde(default)]
    pub site_key: Option<String>,

    /// Siteverify endpoint
    #[serde(default = "default_verify_endpoint")]
    pub endpoint: String,
}

/// Transactional email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Resend API key; submissions are only logged when unset
    #[serde(default)]
    pub api_key: Option<String>,

    /// Resend send-email endpoint
    #[serde(default = "default_mail_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_mail_from")]
    pub from: String,

    #[serde(default = "default_mail_to")]
    pub to: Vec<String>,

    #[serde(default = "default_mail_subject")]
    pub subject: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_outbound_timeout_ms() -> u64 {
    5000
}

fn default_max_per_minute() -> u32 {
    3
}

fn default_max_per_hour() -> u32 {
    10
}

fn default_max_field_len() -> usize {
    256
}

fn default_max_message_len() -> usize {
    5000
}

fn default_verify_endpoint() -> String {
    "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string()
}

fn default_mail_endpoint() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_mail_from() -> String {
    "Odyssey Contact <contact@odysseyts.com>".to_string()
}

fn default_mail_to() -> Vec<String> {
    vec!["contact@odysseyts.com".to_string()]
}

fn default_mail_subject() -> String {
    "New Contact Form Submission".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origins: Vec::new(),
            outbound_timeout_ms: default_outbound_timeout_ms(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            verification: VerificationConfig::default(),
            mail: MailConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_minute: default_max_per_minute(),
            max_per_hour: default_max_per_hour(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_field_len: default_max_field_len(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            secret: None,
            site_key: None,
            endpoint: default_verify_endpoint(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_mail_endpoint(),
            from: default_mail_from(),
            to: default_mail_to(),
            subject: default_mail_subject(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Config {
    /// Build configuration from process environment variables.
    ///
    /// Unset or empty variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.allowed_origins),
            outbound_timeout_ms: get("OUTBOUND_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.outbound_timeout_ms),
            rate_limit: RateLimitConfig {
                max_per_minute: get("RATE_LIMIT_PER_MINUTE")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.rate_limit.max_per_minute),
                max_per_hour: get("RATE_LIMIT_PER_HOUR")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.rate_limit.max_per_hour),
            },
            validation: defaults.validation,
            verification: VerificationConfig {
                secret: get("TURNSTILE_SECRET"),
                site_key: get("TURNSTILE_SITE_KEY"),
                endpoint: get("TURNSTILE_VERIFY_URL").unwrap_or(defaults.verification.endpoint),
            },
            mail: MailConfig {
                api_key: get("RESEND_API_KEY"),
                endpoint: get("RESEND_API_URL").unwrap_or(defaults.mail.endpoint),
                from: get("CONTACT_MAIL_FROM").unwrap_or(defaults.mail.from),
                to: get("CONTACT_MAIL_TO")
                    .map(|v| split_list(&v))
                    .unwrap_or(defaults.mail.to),
                subject: defaults.mail.subject,
            },
            metrics: MetricsConfig {
                enabled: get("METRICS_ENABLED")
                    .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                    .unwrap_or(defaults.metrics.enabled),
                path: defaults.metrics.path,
            },
        }
    }

    /// Check the configuration for values that would fail at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.rate_limit.max_per_minute == 0 {
            return Err(ConfigError::ZeroLimit("per minute"));
        }
        if self.rate_limit.max_per_hour == 0 {
            return Err(ConfigError::ZeroLimit("per hour"));
        }

        check_url("verification.endpoint", &self.verification.endpoint)?;
        check_url("mail.endpoint", &self.mail.endpoint)?;

        if self.mail.to.is_empty() {
            return Err(ConfigError::NoRecipients);
        }

        Ok(())
    }

    /// Parsed bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(self.bind_addr.clone()))
    }

    /// Timeout for verification and dispatch calls.
    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_millis(self.outbound_timeout_ms)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            url: value.to_string(),
        }),
    }
}
