//! Normalization of raw server payloads into strict domain types.
//!
//! Older Famigo collections leak Mongo `_id` keys where newer ones send
//! `id`, and display names arrive as `name` on venues but `title` on
//! events (and occasionally vice versa). All of that is resolved here,
//! once, so nothing heterogeneous ever reaches the store or the screens.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use famigo_core::{EventId, PostId, UserId, VenueId};

use super::ApiError;
use super::types::{
    AgeRange, Contact, Event, EventKind, Place, Post, Pricing, Venue,
};

/// Venue payload as the server actually sends it.
#[derive(Debug, Deserialize)]
pub(super) struct RawVenue {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    location: Option<Place>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    pricing: Pricing,
    #[serde(default)]
    facilities: Vec<String>,
    #[serde(default)]
    age_range: AgeRange,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    total_reviews: u32,
    #[serde(default)]
    contact: Contact,
    #[serde(default)]
    is_verified: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    distance: Option<f64>,
}

pub(super) fn convert_venue(raw: RawVenue) -> Result<Venue, ApiError> {
    let id = raw
        .id
        .ok_or_else(|| ApiError::Malformed("venue payload has no id or _id".to_owned()))?;
    let name = raw
        .name
        .or(raw.title)
        .ok_or_else(|| ApiError::Malformed(format!("venue {id} has no name")))?;

    Ok(Venue {
        id: VenueId::new(id),
        name,
        description: raw.description,
        category: raw.category,
        location: raw.location.unwrap_or_default(),
        images: raw.images,
        pricing: raw.pricing,
        facilities: raw.facilities,
        age_range: raw.age_range,
        rating: raw.rating,
        total_reviews: raw.total_reviews,
        contact: raw.contact,
        is_verified: raw.is_verified,
        created_at: raw.created_at,
        distance: raw.distance,
    })
}

/// Event payload as the server actually sends it.
#[derive(Debug, Deserialize)]
pub(super) struct RawEvent {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    event_type: EventKind,
    date: DateTime<Utc>,
    #[serde(default)]
    location: Option<Place>,
    #[serde(default)]
    host_id: Option<String>,
    #[serde(default)]
    host_name: String,
    #[serde(default)]
    age_range: AgeRange,
    #[serde(default)]
    max_participants: u32,
    #[serde(default)]
    current_participants: u32,
    #[serde(default = "default_true")]
    is_public: bool,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    venue_id: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

pub(super) fn convert_event(raw: RawEvent) -> Result<Event, ApiError> {
    let id = raw
        .id
        .ok_or_else(|| ApiError::Malformed("event payload has no id or _id".to_owned()))?;
    let title = raw
        .title
        .or(raw.name)
        .ok_or_else(|| ApiError::Malformed(format!("event {id} has no title")))?;
    let host_id = raw
        .host_id
        .ok_or_else(|| ApiError::Malformed(format!("event {id} has no host_id")))?;

    Ok(Event {
        id: EventId::new(id),
        title,
        description: raw.description,
        event_type: raw.event_type,
        date: raw.date,
        location: raw.location.unwrap_or_default(),
        host_id: UserId::new(host_id),
        host_name: raw.host_name,
        age_range: raw.age_range,
        max_participants: raw.max_participants,
        current_participants: raw.current_participants,
        is_public: raw.is_public,
        images: raw.images,
        venue_id: raw.venue_id.map(VenueId::new),
        created_at: raw.created_at,
    })
}

/// Post payload as the server actually sends it.
#[derive(Debug, Deserialize)]
pub(super) struct RawPost {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    user_id: String,
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    user_avatar: Option<String>,
    #[serde(default)]
    post_type: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    related_venue_id: Option<String>,
    #[serde(default)]
    related_event_id: Option<String>,
    #[serde(default = "default_true")]
    is_public: bool,
    #[serde(default)]
    likes: u32,
    #[serde(default)]
    comment_count: u32,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

pub(super) fn convert_post(raw: RawPost) -> Result<Post, ApiError> {
    let id = raw
        .id
        .ok_or_else(|| ApiError::Malformed("post payload has no id or _id".to_owned()))?;

    Ok(Post {
        id: PostId::new(id),
        user_id: UserId::new(raw.user_id),
        user_name: raw.user_name,
        user_avatar: raw.user_avatar,
        post_type: raw.post_type,
        content: raw.content,
        images: raw.images,
        related_venue_id: raw.related_venue_id.map(VenueId::new),
        related_event_id: raw.related_event_id.map(EventId::new),
        is_public: raw.is_public,
        likes: raw.likes,
        comment_count: raw.comment_count,
        created_at: raw.created_at,
    })
}

const fn default_true() -> bool {
    true
}
