//! Favorite entries and their denormalized item snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ItemId, UserId};
use crate::types::location::HomeLocation;

/// The kind of item a favorite points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Venue,
    Event,
}

impl ItemKind {
    /// Wire representation used by the `/favorites` endpoints.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Event => "event",
        }
    }
}

/// Denormalized display data captured at favorite-time.
///
/// Intentionally not re-fetched from the source of truth, so it can go
/// stale; the live entity is always reachable through `item_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemSnapshot {
    /// Display title (venue name or event title).
    pub title: String,
    /// Location at favorite-time, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<HomeLocation>,
    /// Primary image reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A favorited venue or event.
///
/// At most one entry exists per `(user, item)` pair at any time; the
/// collection preserves insertion order for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Composite key `{user_id}_{item_id}`, unique per (user, item).
    pub id: String,
    /// The referenced venue or event identifier.
    pub item_id: ItemId,
    /// What kind of item this points at.
    pub item_type: ItemKind,
    /// Display data captured when the favorite was created.
    pub item_data: ItemSnapshot,
    /// When the item was favorited.
    pub created_at: DateTime<Utc>,
}

impl FavoriteEntry {
    /// Build an entry for `user` favoriting `item_id`, stamped now.
    #[must_use]
    pub fn new(user: &UserId, item_id: ItemId, item_type: ItemKind, item_data: ItemSnapshot) -> Self {
        Self {
            id: format!("{user}_{item_id}"),
            item_id,
            item_type,
            item_data,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_id() {
        let entry = FavoriteEntry::new(
            &UserId::new("u1"),
            ItemId::new("v1"),
            ItemKind::Venue,
            ItemSnapshot::default(),
        );
        assert_eq!(entry.id, "u1_v1");
    }

    #[test]
    fn test_item_kind_wire_format() {
        assert_eq!(ItemKind::Venue.as_str(), "venue");
        assert_eq!(
            serde_json::to_string(&ItemKind::Event).unwrap(),
            "\"event\""
        );
        let kind: ItemKind = serde_json::from_str("\"venue\"").unwrap();
        assert_eq!(kind, ItemKind::Venue);
    }

    #[test]
    fn test_serde_roundtrip() {
        let entry = FavoriteEntry::new(
            &UserId::new("u1"),
            ItemId::new("e1"),
            ItemKind::Event,
            ItemSnapshot {
                title: "Playdate in the park".to_owned(),
                location: None,
                image: None,
            },
        );
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: FavoriteEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
