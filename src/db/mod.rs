//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Profiles, keyed by google_id.
    pub const PROFILES: &str = "profiles";
}
