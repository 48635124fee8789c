// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod profile;

pub use profile::{EditableFields, Profile};
