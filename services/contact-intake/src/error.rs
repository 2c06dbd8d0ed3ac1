// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal failures of a contact submission and their HTTP mapping.

use crate::limiter::RateLimitReason;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Why a submission was rejected. No variant is retried internally.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{reason}")]
    TooManyRequests {
        reason: RateLimitReason,
        retry_after: Duration,
    },

    #[error("Invalid JSON")]
    InvalidPayload,

    #[error("{0}")]
    MissingOrInvalidFields(ValidationError),

    #[error("Failed Turnstile verification")]
    VerificationFailed,

    /// Provider detail is kept for logs and never sent to the client.
    #[error("Email dispatch failed: {0}")]
    DispatchFailed(String),
}

impl SubmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidPayload
            | Self::MissingOrInvalidFields(_)
            | Self::VerificationFailed => StatusCode::BAD_REQUEST,
            Self::DispatchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::TooManyRequests { .. } => "RATE_LIMITED",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::MissingOrInvalidFields(_) => "MISSING_OR_INVALID_FIELDS",
            Self::VerificationFailed => "VERIFICATION_FAILED",
            Self::DispatchFailed(_) => "DISPATCH_FAILED",
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::TooManyRequests { .. } => "Too many requests".to_string(),
            Self::DispatchFailed(_) => "Failed to send message".to_string(),
            other => other.to_string(),
        }
    }
}

/// Success body for the contact endpoint.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
            code: self.code(),
            retry_after_secs: None,
        };

        match self {
            Self::TooManyRequests { retry_after, .. } => {
                let secs = ceil_secs(retry_after);
                (
                    status,
                    [(header::RETRY_AFTER, secs.to_string())],
                    Json(ErrorResponse {
                        retry_after_secs: Some(secs),
                        ..body
                    }),
                )
                    .into_response()
            }
            _ => (status, Json(body)).into_response(),
        }
    }
}

/// Whole seconds, rounded up so clients never retry early.
fn ceil_secs(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    u64::try_from(millis.div_ceil(1000)).unwrap_or(u64::MAX)
}
