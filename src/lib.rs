// SPDX-License-Identifier: MIT

//! Portfolio API: backend for the personal-portfolio web application.
//!
//! Users sign in with Google; the sign-in callback reconciles the identity
//! against the profile store, and the edit endpoint validates submissions
//! (required fields, then a geographic address constraint) before persisting.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{GoogleAuthClient, IdentityService, ProfileEditService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub google: GoogleAuthClient,
    pub identity: IdentityService,
    pub editor: ProfileEditService,
}
