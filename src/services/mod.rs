// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod geocoder;
pub mod google;
pub mod identity;
pub mod profile_edit;

pub use geocoder::GeocoderClient;
pub use google::{GoogleAuthClient, IdentityAssertion};
pub use identity::{IdentityService, Reconciliation};
pub use profile_edit::{EditOutcome, EditRejection, ProfileEditService};
