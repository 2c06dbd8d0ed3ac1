// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission validator.
//!
//! Implements server-side field checks:
//! - Required field presence (name, company, email, message)
//! - Length ceilings
//! - Email address grammar

use crate::config::ValidationConfig;
use crate::submission::Submission;
use thiserror::Error;
use tracing::debug;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_LABEL_LEN: usize = 63;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid email address")]
    InvalidEmail,
}

/// Validator for contact submissions.
pub struct SubmissionValidator {
    config: ValidationConfig,
}

impl SubmissionValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a normalized submission.
    pub fn validate(&self, submission: &Submission) -> Result<(), ValidationError> {
        let required = [
            ("name", submission.name.as_str()),
            ("company", submission.company.as_str()),
            ("email", submission.email.as_str()),
            ("message", submission.message.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                debug!(field, "Missing required field");
                return Err(ValidationError::MissingField(field));
            }
        }

        let bounded = [
            ("name", submission.name.as_str()),
            ("company", submission.company.as_str()),
            ("email", submission.email.as_str()),
            ("phone", submission.phone.as_deref().unwrap_or("")),
        ];
        for (field, value) in bounded {
            self.check_len(field, value, self.config.max_field_len)?;
        }
        self.check_len("message", &submission.message, self.config.max_message_len)?;

        if !is_valid_email(&submission.email) {
            debug!("Email address failed grammar check");
            return Err(ValidationError::InvalidEmail);
        }

        Ok(())
    }

    fn check_len(&self, field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
        if value.chars().count() > max {
            debug!(field, max, "Field too long");
            return Err(ValidationError::TooLong { field, max });
        }
        Ok(())
    }
}

/// Check an address against a practical subset of the RFC 5321 grammar:
/// `local@domain` where the domain has at least two dot-separated labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    if local.is_empty()
        || local.len() > MAX_LOCAL_PART_LEN
        || domain.contains('@')
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
        || !local.chars().all(is_local_char)
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| is_valid_label(label))
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~.".contains(c)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
