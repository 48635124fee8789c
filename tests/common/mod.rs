// SPDX-License-Identifier: MIT

use portfolio_api::config::Config;
use portfolio_api::db::FirestoreDb;
use portfolio_api::routes::create_router;
use portfolio_api::services::{GeocoderClient, GoogleAuthClient, IdentityService, ProfileEditService};
use portfolio_api::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a session JWT for tests.
#[allow(dead_code)]
pub fn create_test_jwt(google_id: &str, signing_key: &[u8]) -> String {
    portfolio_api::middleware::auth::create_jwt(google_id, signing_key)
        .expect("Failed to create test JWT")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let google = GoogleAuthClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    )
    .expect("Failed to build Google client");

    // Points at a closed port so any geocoder call fails fast.
    let geocoder =
        GeocoderClient::new(&config.geocoder_base_url).expect("Failed to build geocoder client");

    let identity = IdentityService::new(db.clone());
    let editor = ProfileEditService::new(db.clone(), geocoder, config.max_address_distance_km);

    let state = Arc::new(AppState {
        config,
        db,
        google,
        identity,
        editor,
    });

    (create_router(state.clone()), state)
}
