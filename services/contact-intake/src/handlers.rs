// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact intake service.

use crate::config::Config;
use crate::error::SuccessResponse;
use crate::metrics::Metrics;
use crate::pipeline::ContactPipeline;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client identifier used when neither a forwarding header nor a peer
/// address is available.
pub const UNKNOWN_CLIENT: &str = "local";

/// Shared application state.
pub struct AppState {
    pub pipeline: ContactPipeline,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, pipeline: ContactPipeline) -> Result<Self, prometheus::Error> {
        Ok(Self {
            pipeline,
            metrics: Metrics::new()?,
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Newsletter signup response.
#[derive(Debug, Serialize)]
pub struct NewsletterResponse {
    pub ok: bool,
}

/// Public settings for the contact form widget.
#[derive(Debug, Serialize)]
pub struct WidgetResponse {
    pub turnstile_site_key: Option<String>,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accept a contact form submission.
///
/// Every accepted outcome, including a honeypot catch, answers
/// `{"success":true}`.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client = client_id(&headers, peer.map(|ConnectInfo(addr)| addr));
    debug!(client = %client, bytes = body.len(), "Processing contact submission");

    let outcome = state.pipeline.process(&client, &body).await;
    state.metrics.record_submission(&outcome);

    match outcome {
        Ok(_) => Json(SuccessResponse { success: true }).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Newsletter signup stub: logs the raw body and always succeeds.
pub async fn newsletter(State(state): State<Arc<AppState>>, body: Bytes) -> Json<NewsletterResponse> {
    info!(body = %String::from_utf8_lossy(&body), "Newsletter subscribe");
    state.metrics.record_newsletter_signup();
    Json(NewsletterResponse { ok: true })
}

/// Expose the Turnstile site key so the form knows whether to render the
/// challenge widget.
pub async fn widget(State(state): State<Arc<AppState>>) -> Json<WidgetResponse> {
    Json(WidgetResponse {
        turnstile_site_key: state.config.verification.site_key.clone(),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Identify the client: first `X-Forwarded-For` hop, then the peer address.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(hop), _) => hop.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT.to_string(),
    }
}
