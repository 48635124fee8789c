// SPDX-License-Identifier: MIT

//! Profile API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{EditableFields, Profile};
use crate::services::{EditOutcome, EditRejection};
use crate::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/profile", put(update_profile))
}

// ─── Profile Fetch ───────────────────────────────────────────

/// Profile response. Email and google_id are carried for display but are not
/// editable through this API.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub birthdate: String,
    pub address: String,
    pub phone: String,
    pub avatar_url: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let avatar_url = profile.avatar_or_placeholder().to_string();
        Self {
            google_id: profile.google_id,
            email: profile.email,
            name: profile.name,
            surname: profile.surname,
            birthdate: profile.birthdate,
            address: profile.address,
            phone: profile.phone,
            avatar_url,
        }
    }
}

/// Get the current user's profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_profile(&user.google_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.google_id)))?;

    Ok(Json(ProfileResponse::from(profile)))
}

// ─── Profile Edit ────────────────────────────────────────────

/// Edit form payload. Email is deliberately absent: it is provider-sourced
/// and read-only.
#[derive(Deserialize)]
pub struct EditProfileRequest {
    pub name: String,
    pub surname: String,
    pub birthdate: String,
    pub address: String,
    pub phone: String,
}

/// Rejection body for globally rejected edit submissions (the address
/// checks). Field-level violations go through [`AppError::Validation`].
#[derive(Serialize)]
pub struct EditRejectedResponse {
    pub error: &'static str,
    pub message: String,
}

/// Submit a profile edit.
///
/// 200 with the persisted profile on success; 422 with field or global
/// errors on rejection. A store failure after validation surfaces as a 500
/// so the client knows the data was valid but not saved.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<EditProfileRequest>,
) -> Result<Response> {
    let fields = EditableFields {
        name: request.name,
        surname: request.surname,
        birthdate: request.birthdate,
        address: request.address,
        phone: request.phone,
    };

    let outcome = state.editor.submit(&user.google_id, &fields).await?;

    let response = match outcome {
        EditOutcome::Persisted(profile) => Json(ProfileResponse::from(profile)).into_response(),
        EditOutcome::Rejected(EditRejection::Fields(errors)) => {
            return Err(AppError::Validation(errors));
        }
        EditOutcome::Rejected(rejection) => {
            let body = rejection_body(&rejection);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
    };

    Ok(response)
}

fn rejection_body(rejection: &EditRejection) -> EditRejectedResponse {
    match rejection {
        // Field violations never reach here; they use AppError::Validation.
        EditRejection::Fields(_) => EditRejectedResponse {
            error: "invalid_fields",
            message: "One or more fields are invalid".to_string(),
        },
        EditRejection::AddressNotFound => EditRejectedResponse {
            error: "address_not_found",
            message: "Address not found".to_string(),
        },
        EditRejection::TooFar { distance_km } => EditRejectedResponse {
            error: "address_too_far",
            message: format!(
                "The address is {:.0} km from the reference point, outside the allowed area",
                distance_km
            ),
        },
        EditRejection::GeocoderUnavailable => EditRejectedResponse {
            error: "address_validation_failed",
            message: "Address could not be validated, please try again".to_string(),
        },
    }
}
