// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed profile-store operations.
//!
//! Profiles are stored in a single collection keyed by the external identity
//! id (`google_id`). Keying documents by the external id is what enforces
//! "exactly one profile per identity": a create of an existing document id
//! fails, and the reconciler turns that failure into the update path.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{EditableFields, Profile};
use serde::Serialize;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Avatar-only write, applied with a field mask so no other profile field is
/// touched by a repeat sign-in.
#[derive(Serialize, serde::Deserialize)]
struct AvatarPatch {
    avatar_url: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Look up a profile by its external identity id.
    ///
    /// A missing document is not an error; it drives the create path.
    pub async fn get_profile(&self, google_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(google_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new profile. Fails with [`AppError::Conflict`] if a profile
    /// for the same google_id already exists (lost creation race).
    pub async fn create_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::PROFILES)
            .document_id(&profile.google_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| match e {
                firestore::errors::FirestoreError::DataConflictError(conflict) => {
                    AppError::Conflict(conflict.to_string())
                }
                other => AppError::Database(other.to_string()),
            })?;
        Ok(())
    }

    /// Refresh the avatar of an existing profile.
    ///
    /// A field-mask update: only `avatar_url` is written.
    pub async fn update_avatar(&self, google_id: &str, avatar_url: &str) -> Result<(), AppError> {
        let patch = AvatarPatch {
            avatar_url: avatar_url.to_string(),
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths!(AvatarPatch::{avatar_url}))
            .in_col(collections::PROFILES)
            .document_id(google_id)
            .object(&patch)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Apply the full editable field set in one write.
    ///
    /// Single-document writes are atomic in Firestore, so the edit either
    /// commits all submitted fields or none of them.
    pub async fn update_editable_fields(
        &self,
        google_id: &str,
        fields: &EditableFields,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths!(EditableFields::{
                name,
                surname,
                birthdate,
                address,
                phone
            }))
            .in_col(collections::PROFILES)
            .document_id(google_id)
            .object(fields)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a profile. Test helper for the emulator suite.
    pub async fn delete_profile(&self, google_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PROFILES)
            .document_id(google_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
