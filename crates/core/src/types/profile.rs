//! User profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::email::Email;
use crate::types::id::UserId;
use crate::types::location::HomeLocation;

/// Errors that can occur when constructing a [`UserProfile`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProfileError {
    /// The display name is empty or whitespace-only.
    #[error("profile name cannot be empty")]
    EmptyName,
}

/// The current user's profile.
///
/// Created when the user completes onboarding and replaced wholesale on
/// every save - there is no partial-field merge. The profile is persisted
/// locally on every change and loaded once at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable opaque identifier, generated client-side as a UUID v4.
    pub id: UserId,
    /// Display name. Non-empty for a complete profile.
    pub name: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    /// Optional avatar URI or inline-encoded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Optional short bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Known ages of the user's kids, in years. Ordered; may be empty.
    #[serde(default)]
    pub kids_ages: Vec<u8>,
    /// Home city and coordinates.
    pub home_location: HomeLocation,
    /// When the profile was last saved.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new profile with a freshly generated UUID.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::EmptyName`] if `name` is empty or
    /// whitespace-only.
    pub fn new(name: impl Into<String>, home_location: HomeLocation) -> Result<Self, ProfileError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }

        Ok(Self {
            id: UserId::new(Uuid::new_v4().to_string()),
            name,
            email: None,
            avatar: None,
            bio: None,
            kids_ages: Vec::new(),
            home_location,
            updated_at: Utc::now(),
        })
    }

    /// Whether the profile is complete enough to act on behalf of the user.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::location::GeoPoint;

    fn melbourne() -> HomeLocation {
        HomeLocation::new("Melbourne", GeoPoint::new(-37.8136, 144.9631))
    }

    #[test]
    fn test_new_generates_unique_ids() {
        let a = UserProfile::new("Alex", melbourne()).unwrap();
        let b = UserProfile::new("Alex", melbourne()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_new_rejects_empty_name() {
        assert!(matches!(
            UserProfile::new("", melbourne()),
            Err(ProfileError::EmptyName)
        ));
        assert!(matches!(
            UserProfile::new("   ", melbourne()),
            Err(ProfileError::EmptyName)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut profile = UserProfile::new("Alex", melbourne()).unwrap();
        profile.kids_ages = vec![3, 7];
        profile.email = Some(Email::parse("alex@example.com").unwrap());

        let json = serde_json::to_string(&profile).unwrap();
        let parsed: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn test_deserialize_tolerates_missing_optionals() {
        let json = r#"{
            "id": "u-1",
            "name": "Alex",
            "home_location": {"city": "Melbourne", "coordinates": {"lat": -37.8, "lng": 144.9}}
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.email.is_none());
        assert!(profile.kids_ages.is_empty());
    }
}
