// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake
//!
//! Backend for the marketing site's contact and newsletter forms:
//!
//! - Sliding-window rate limiting per client (3/min, 10/hour default)
//! - Honeypot bot trap with a fake success answer
//! - Server-side field and email validation
//! - Optional Cloudflare Turnstile verification
//! - Optional delivery through Resend, otherwise log-only

pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod pipeline;
pub mod submission;
pub mod validator;
pub mod verify;

pub use config::Config;
pub use error::SubmissionError;
pub use limiter::{RateLimitResult, RateLimiter, WindowCounts};
pub use pipeline::{Accepted, ContactPipeline};
pub use submission::Submission;
pub use validator::{SubmissionValidator, ValidationError};

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use handlers::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the service router.
pub fn app(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .route("/api/contact", post(handlers::contact))
        .route("/api/contact/widget", get(handlers::widget))
        .route("/api/newsletter", post(handlers::newsletter));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(handlers::metrics));
    }

    let router = router.layer(TraceLayer::new_for_http());
    let router = match cors_layer(&state.config.allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

/// CORS for browser callers on other origins; `None` when none are listed.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}
