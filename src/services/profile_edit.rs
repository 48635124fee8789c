// SPDX-License-Identifier: MIT

//! Profile edit validation pipeline.
//!
//! A submission moves through three stages: local required-field validation
//! (pure, no external calls), the geographic address constraint (external,
//! fails closed), and a single atomic persistence write. A rejection at any
//! stage leaves the stored profile untouched.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{EditableFields, Profile};
use crate::services::geocoder::{distance_from_reference_km, GeocoderClient};
use std::collections::BTreeMap;

/// Why an edit submission was rejected. All of these are user-correctable;
/// none of them indicate a store problem.
#[derive(Debug, Clone, PartialEq)]
pub enum EditRejection {
    /// Stage A: one or more required fields missing or malformed.
    Fields(BTreeMap<String, String>),
    /// Stage B: the geocoder returned zero candidates for the address.
    AddressNotFound,
    /// Stage B: the address resolved outside the allowed radius.
    TooFar { distance_km: f64 },
    /// Stage B: the geocoder could not be consulted; the check is never
    /// skipped, so the submission is rejected.
    GeocoderUnavailable,
}

/// Terminal state of one edit submission.
#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// All stages passed; the returned profile reflects the submitted fields.
    Persisted(Profile),
    Rejected(EditRejection),
}

/// Service that validates and persists profile edits.
#[derive(Clone)]
pub struct ProfileEditService {
    db: FirestoreDb,
    geocoder: GeocoderClient,
    max_distance_km: f64,
}

impl ProfileEditService {
    pub fn new(db: FirestoreDb, geocoder: GeocoderClient, max_distance_km: f64) -> Self {
        Self {
            db,
            geocoder,
            max_distance_km,
        }
    }

    /// Run a submission through the pipeline.
    ///
    /// `Err` is reserved for store failures (a distinct channel from
    /// validation: the data was valid but not saved).
    pub async fn submit(
        &self,
        google_id: &str,
        fields: &EditableFields,
    ) -> Result<EditOutcome, AppError> {
        // Stage A: local validation. No external call is made when it fails.
        let errors = validate_fields(fields);
        if !errors.is_empty() {
            return Ok(EditOutcome::Rejected(EditRejection::Fields(errors)));
        }

        // Stage B: geographic constraint, failing closed.
        let candidates = match self.geocoder.search(fields.address.trim()).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "Geocoder lookup failed, rejecting edit");
                return Ok(EditOutcome::Rejected(EditRejection::GeocoderUnavailable));
            }
        };

        let Some(first) = candidates.first() else {
            return Ok(EditOutcome::Rejected(EditRejection::AddressNotFound));
        };

        let distance_km = distance_from_reference_km(first);
        if distance_km > self.max_distance_km {
            tracing::debug!(
                google_id,
                distance_km,
                limit_km = self.max_distance_km,
                "Address outside allowed radius"
            );
            return Ok(EditOutcome::Rejected(EditRejection::TooFar { distance_km }));
        }

        // Stage C: persist the full editable set in one write.
        let profile = self
            .db
            .get_profile(google_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", google_id)))?;

        self.db.update_editable_fields(google_id, fields).await?;

        tracing::info!(google_id, "Profile edit persisted");

        Ok(EditOutcome::Persisted(Profile {
            name: fields.name.clone(),
            surname: fields.surname.clone(),
            birthdate: fields.birthdate.clone(),
            address: fields.address.clone(),
            phone: fields.phone.clone(),
            ..profile
        }))
    }
}

/// Stage A: required-field validation.
///
/// Each of name, surname, birthdate, address and phone must be non-empty
/// after trimming; birthdate must additionally be an ISO date. Email is
/// provider-sourced and never validated here. Pure so it can be tested
/// without any service wiring.
pub fn validate_fields(fields: &EditableFields) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    if fields.name.trim().is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    }
    if fields.surname.trim().is_empty() {
        errors.insert("surname".to_string(), "Surname is required".to_string());
    }
    if fields.address.trim().is_empty() {
        errors.insert("address".to_string(), "Address is required".to_string());
    }
    if fields.phone.trim().is_empty() {
        errors.insert("phone".to_string(), "Phone number is required".to_string());
    }

    let birthdate = fields.birthdate.trim();
    if birthdate.is_empty() {
        errors.insert("birthdate".to_string(), "Birthdate is required".to_string());
    } else if chrono::NaiveDate::parse_from_str(birthdate, "%Y-%m-%d").is_err() {
        errors.insert(
            "birthdate".to_string(),
            "Birthdate must be a date (YYYY-MM-DD)".to_string(),
        );
    }

    errors
}
