// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Service
//!
//! Receives the marketing site's contact and newsletter form posts.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_PER_MINUTE` / `RATE_LIMIT_PER_HOUR`: submission ceilings per
//!   client (default: 3 / 10)
//! - `TURNSTILE_SECRET`: enables Turnstile verification
//! - `TURNSTILE_SITE_KEY`: public key served to the form widget
//! - `RESEND_API_KEY`: enables email delivery; without it submissions are
//!   only logged
//! - `CONTACT_MAIL_FROM` / `CONTACT_MAIL_TO`: notification envelope
//! - `OUTBOUND_TIMEOUT_MS`: timeout for verification and email calls
//!   (default: 5000)
//! - `ALLOWED_ORIGINS`: comma separated CORS origins

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_intake::{app, handlers::AppState, Config, ContactPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load environment variables
    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env file");
    }

    let config = Config::from_env();
    config.validate()?;
    let addr = config.socket_addr()?;

    let pipeline = ContactPipeline::from_config(&config)?;
    info!(
        bind_addr = %addr,
        max_per_minute = config.rate_limit.max_per_minute,
        max_per_hour = config.rate_limit.max_per_hour,
        verification = pipeline.verification_enabled(),
        dispatch = pipeline.dispatch_enabled(),
        "Starting contact intake service"
    );
    if !pipeline.verification_enabled() {
        warn!("TURNSTILE_SECRET not set, human verification disabled");
    }
    if !pipeline.dispatch_enabled() {
        warn!("RESEND_API_KEY not set, submissions will only be logged");
    }

    let state = Arc::new(AppState::new(config, pipeline)?);

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.pipeline.limiter().cleanup().await;
        }
    });

    let app = app(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
