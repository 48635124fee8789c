// SPDX-License-Identifier: MIT

//! Portfolio API Server
//!
//! Backend for the personal-portfolio application: Google sign-in with
//! profile reconciliation, and geo-constrained profile editing.

use portfolio_api::{
    config::Config,
    db::FirestoreDb,
    services::{GeocoderClient, GoogleAuthClient, IdentityService, ProfileEditService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Portfolio API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize outbound clients
    let google = GoogleAuthClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    )
    .expect("Failed to initialize Google OAuth client");

    let geocoder = GeocoderClient::new(&config.geocoder_base_url)
        .expect("Failed to initialize geocoder client");
    tracing::info!(
        geocoder = %config.geocoder_base_url,
        max_distance_km = config.max_address_distance_km,
        "Geocoder client initialized"
    );

    // Build services
    let identity = IdentityService::new(db.clone());
    let editor = ProfileEditService::new(db.clone(), geocoder, config.max_address_distance_km);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        google,
        identity,
        editor,
    });

    // Build router
    let app = portfolio_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
