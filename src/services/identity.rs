// SPDX-License-Identifier: MIT

//! Identity reconciliation: map an external identity assertion to exactly
//! one profile record.
//!
//! First sign-in creates the profile; every later sign-in refreshes only the
//! avatar. Creation races between concurrent first sign-ins are settled by
//! the store's uniqueness on the document id: the loser sees a conflict and
//! falls back to the update path instead of denying the sign-in.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::Profile;
use crate::services::google::IdentityAssertion;

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub profile: Profile,
    /// Whether this sign-in created the profile.
    pub created: bool,
}

/// Service that reconciles identity assertions against the profile store.
#[derive(Clone)]
pub struct IdentityService {
    db: FirestoreDb,
}

impl IdentityService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Reconcile an identity assertion with the profile store.
    ///
    /// Returns `Ok` when the sign-in may proceed; any error denies it and is
    /// surfaced to the caller for operator logging. A lookup miss is not an
    /// error: it drives the create path.
    pub async fn reconcile(&self, assertion: &IdentityAssertion) -> Result<Reconciliation, AppError> {
        match self.db.get_profile(&assertion.external_id).await? {
            Some(profile) => self.refresh_avatar(profile, assertion).await,
            None => self.create(assertion).await,
        }
    }

    /// First sign-in: insert a full profile with a generated surrogate id.
    ///
    /// If the insert loses a creation race, the profile now exists, so retry
    /// the lookup-and-update path exactly once.
    async fn create(&self, assertion: &IdentityAssertion) -> Result<Reconciliation, AppError> {
        let profile = Profile::new(
            &assertion.external_id,
            &assertion.email,
            &assertion.avatar_url,
        );

        match self.db.create_profile(&profile).await {
            Ok(()) => {
                tracing::info!(
                    google_id = %assertion.external_id,
                    profile_id = %profile.id,
                    "Profile created on first sign-in"
                );
                Ok(Reconciliation {
                    profile,
                    created: true,
                })
            }
            Err(AppError::Conflict(_)) => {
                tracing::info!(
                    google_id = %assertion.external_id,
                    "Lost profile creation race, switching to update path"
                );

                let existing = self
                    .db
                    .get_profile(&assertion.external_id)
                    .await?
                    .ok_or_else(|| {
                        // The store reported "exists" on insert and "missing"
                        // on the retry lookup. Deny the sign-in.
                        AppError::Database(format!(
                            "Profile for {} vanished after insert conflict",
                            assertion.external_id
                        ))
                    })?;

                self.refresh_avatar(existing, assertion).await
            }
            Err(e) => Err(e),
        }
    }

    /// Repeat sign-in: refresh only the avatar from the provider's current
    /// value. Idempotent; no other field is touched.
    async fn refresh_avatar(
        &self,
        mut profile: Profile,
        assertion: &IdentityAssertion,
    ) -> Result<Reconciliation, AppError> {
        self.db
            .update_avatar(&assertion.external_id, &assertion.avatar_url)
            .await?;

        profile.avatar_url = assertion.avatar_url.clone();

        tracing::debug!(
            google_id = %assertion.external_id,
            "Avatar refreshed on sign-in"
        );

        Ok(Reconciliation {
            profile,
            created: false,
        })
    }
}
