//! Profile model for storage and API.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a profile has no avatar yet.
pub const PLACEHOLDER_AVATAR_URL: &str = "https://via.placeholder.com/150";

/// User profile stored in Firestore.
///
/// Documents are keyed by `google_id`, so the store itself enforces
/// at most one profile per external identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Internally generated id, assigned once at creation. Immutable.
    pub id: String,
    /// Google subject id (also the document ID). Immutable.
    pub google_id: String,
    /// Email from the identity provider; read-only in the edit flow.
    pub email: String,
    /// First name
    pub name: String,
    /// Last name
    pub surname: String,
    /// Birthdate as an ISO date (YYYY-MM-DD)
    pub birthdate: String,
    /// Postal address (free text, geocoded on edit)
    pub address: String,
    /// Phone number
    pub phone: String,
    /// Avatar URL, refreshed from the provider on every sign-in
    pub avatar_url: String,
    /// When the profile was first created (RFC 3339)
    pub created_at: String,
}

impl Profile {
    /// Build a fresh profile from an identity assertion.
    ///
    /// Editable fields start empty; the surrogate `id` is generated here and
    /// is independent of the provider's id format.
    pub fn new(google_id: &str, email: &str, avatar_url: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            google_id: google_id.to_string(),
            email: email.to_string(),
            name: String::new(),
            surname: String::new(),
            birthdate: String::new(),
            address: String::new(),
            phone: String::new(),
            avatar_url: avatar_url.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Avatar URL with a placeholder fallback for profiles that have none.
    pub fn avatar_or_placeholder(&self) -> &str {
        if self.avatar_url.is_empty() {
            PLACEHOLDER_AVATAR_URL
        } else {
            &self.avatar_url
        }
    }
}

/// The user-editable field set, applied as a single atomic write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditableFields {
    pub name: String,
    pub surname: String,
    pub birthdate: String,
    pub address: String,
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_has_empty_editable_fields() {
        let profile = Profile::new("google-123", "a@example.com", "https://img.example/p.jpg");

        assert_eq!(profile.google_id, "google-123");
        assert_eq!(profile.email, "a@example.com");
        assert_eq!(profile.avatar_url, "https://img.example/p.jpg");
        assert!(profile.name.is_empty());
        assert!(profile.surname.is_empty());
        assert!(profile.birthdate.is_empty());
        assert!(profile.address.is_empty());
        assert!(profile.phone.is_empty());
        assert!(!profile.id.is_empty());
    }

    #[test]
    fn test_surrogate_ids_are_unique() {
        let a = Profile::new("g1", "a@example.com", "");
        let b = Profile::new("g1", "a@example.com", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_avatar_placeholder_fallback() {
        let mut profile = Profile::new("g1", "a@example.com", "");
        assert_eq!(profile.avatar_or_placeholder(), PLACEHOLDER_AVATAR_URL);

        profile.avatar_url = "https://img.example/p.jpg".to_string();
        assert_eq!(profile.avatar_or_placeholder(), "https://img.example/p.jpg");
    }
}
