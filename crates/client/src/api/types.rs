//! Strict domain types for the Famigo REST API.
//!
//! Everything here is the *normalized* shape: server payloads (which mix
//! `id`/`_id` keys and `name`/`title` fields depending on collection age)
//! are converted in [`super::conversions`] before they reach consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use famigo_core::{BookingId, EventId, GeoPoint, HomeLocation, ItemSnapshot, PostId, UserId, VenueId};

/// A street address with optional coordinates, as venues and events carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Place {
    /// Street address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City name.
    pub city: String,
    /// Coordinates, if geocoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
}

impl Place {
    /// Reduce to the city/coordinates pair used in favorite snapshots.
    #[must_use]
    pub fn to_home_location(&self) -> HomeLocation {
        HomeLocation::new(self.city.clone(), self.coordinates.unwrap_or_default())
    }
}

/// Whether a venue charges admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceKind {
    #[default]
    Free,
    Paid,
}

/// Venue pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pricing {
    /// Free or paid admission.
    #[serde(rename = "type")]
    pub kind: PriceKind,
    /// Admission price, when paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Currency code (e.g. `AUD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Suitable age range in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

/// Venue contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A family-activity venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub description: String,
    /// Category label: Indoor, Outdoor, Farm, Playground, ...
    pub category: String,
    pub location: Place,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub age_range: AgeRange,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Distance in km, present on nearby-search results only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Venue {
    /// Denormalized display data for a favorite entry.
    #[must_use]
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            title: self.name.clone(),
            location: Some(self.location.to_home_location()),
            image: self.images.first().cloned(),
        }
    }
}

/// Input for creating a venue.
#[derive(Debug, Clone, Serialize)]
pub struct VenueCreate {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: Place,
    #[serde(default)]
    pub images: Vec<String>,
    pub pricing: Pricing,
    #[serde(default)]
    pub facilities: Vec<String>,
    pub age_range: AgeRange,
    #[serde(default)]
    pub contact: Contact,
}

/// Kind of event: an informal playdate or an event hosted at a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Playdate,
    VenueEvent,
}

/// A scheduled family event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub event_type: EventKind,
    pub date: DateTime<Utc>,
    pub location: Place,
    pub host_id: UserId,
    pub host_name: String,
    #[serde(default)]
    pub age_range: AgeRange,
    pub max_participants: u32,
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Denormalized display data for a favorite entry.
    #[must_use]
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            title: self.title.clone(),
            location: Some(self.location.to_home_location()),
            image: self.images.first().cloned(),
        }
    }
}

/// Input for creating an event.
#[derive(Debug, Clone, Serialize)]
pub struct EventCreate {
    pub title: String,
    pub description: String,
    pub event_type: EventKind,
    pub date: DateTime<Utc>,
    pub location: Place,
    pub host_id: UserId,
    pub host_name: String,
    pub age_range: AgeRange,
    pub max_participants: u32,
    pub is_public: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
}

/// RSVP status for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Accepted,
    Declined,
    Maybe,
}

/// RSVP request body.
#[derive(Debug, Clone, Serialize)]
pub struct RsvpRequest {
    pub user_id: UserId,
    pub user_name: String,
    pub status: RsvpStatus,
}

/// An accepted attendee of an event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attendee {
    pub event_id: EventId,
    pub user_id: UserId,
    pub user_name: String,
    pub status: RsvpStatus,
}

/// A community post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    /// `photo_share`, `event_announcement`, `recommendation`, `invitation`, `status`.
    pub post_type: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_venue_id: Option<VenueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_event_id: Option<EventId>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostCreate {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub post_type: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_venue_id: Option<VenueId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_event_id: Option<EventId>,
    pub is_public: bool,
}

/// A venue or event review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    pub user_id: UserId,
    pub user_name: String,
    /// 1-5 stars.
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating a review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Payment status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// A venue or event booking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    pub date: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub amount: f64,
    pub ticket_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating a booking.
#[derive(Debug, Clone, Serialize)]
pub struct BookingCreate {
    pub user_id: UserId,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<VenueId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    pub date: DateTime<Utc>,
    pub amount: f64,
}

/// Filters for `GET /venues`.
#[derive(Debug, Clone, Default)]
pub struct VenueFilter {
    pub category: Option<String>,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub price_type: Option<PriceKind>,
    pub search: Option<String>,
}

impl VenueFilter {
    /// Whether the filter selects everything (cacheable list).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_age.is_none()
            && self.max_age.is_none()
            && self.price_type.is_none()
            && self.search.is_none()
    }
}

/// Filters for `GET /events`.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub event_type: Option<EventKind>,
    pub is_public: Option<bool>,
    pub host_id: Option<UserId>,
}

impl EventFilter {
    /// Whether the filter selects everything (cacheable list).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.is_public.is_none() && self.host_id.is_none()
    }
}

const fn default_true() -> bool {
    true
}
