//! Famigo REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest` against `{base_url}/api`
//! - The backend is the source of truth for venues, events, posts,
//!   reviews, and bookings; favorites are pushed through
//!   [`crate::store::FavoriteSync`]
//! - Venue and event reads are cached via `moka` (5-minute TTL);
//!   mutations are never cached
//! - Raw payloads are normalized in [`conversions`] before leaving this
//!   module

mod cache;
mod conversions;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use famigo_core::{EventId, FavoriteEntry, ItemId, UserId, VenueId};

use crate::config::ApiConfig;
use crate::store::FavoriteSync;
use cache::CacheValue;
use conversions::{RawEvent, RawPost, RawVenue, convert_event, convert_post, convert_venue};
use types::{
    Attendee, Booking, BookingCreate, Event, EventCreate, EventFilter, Post, PostCreate, Review,
    ReviewCreate, RsvpRequest, Venue, VenueCreate, VenueFilter,
};

/// Read-cache TTL. Matches the original app's tolerance for slightly
/// stale listings.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when talking to the Famigo API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The response body was not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload parsed but is missing required data.
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Client for the Famigo REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: format!("{}/api", config.base_url.trim_end_matches('/')),
                cache,
            }),
        })
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).query(query).send().await?;
        Self::read_json(path, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.post(&url).json(body).send().await?;
        Self::read_json(path, response).await
    }

    /// POST where the caller only cares about success.
    async fn post_unit(&self, path: &str, body: &impl Serialize) -> Result<(), ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Self::status_error(path, status, message));
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        // Read as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(path, status, text));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                path,
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    fn status_error(path: &str, status: reqwest::StatusCode, message: String) -> ApiError {
        if status == reqwest::StatusCode::NOT_FOUND {
            return ApiError::NotFound(path.to_owned());
        }
        ApiError::Api {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        }
    }

    // =========================================================================
    // Venue Methods
    // =========================================================================

    /// List venues, optionally filtered.
    ///
    /// The unfiltered list is cached; filtered queries always hit the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn venues(&self, filter: &VenueFilter) -> Result<Vec<Venue>, ApiError> {
        if filter.is_empty()
            && let Some(CacheValue::Venues(venues)) = self.inner.cache.get("venues").await
        {
            debug!("Cache hit for venues");
            return Ok(venues);
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(category) = &filter.category {
            query.push(("category", category.clone()));
        }
        if let Some(min_age) = filter.min_age {
            query.push(("min_age", min_age.to_string()));
        }
        if let Some(max_age) = filter.max_age {
            query.push(("max_age", max_age.to_string()));
        }
        if let Some(price_type) = filter.price_type {
            query.push(("price_type", format!("{price_type:?}").to_lowercase()));
        }
        if let Some(search) = &filter.search {
            query.push(("search", search.clone()));
        }

        let raw: Vec<RawVenue> = self.get_json("/venues", &query).await?;
        let venues = raw
            .into_iter()
            .map(convert_venue)
            .collect::<Result<Vec<_>, _>>()?;

        if filter.is_empty() {
            self.inner
                .cache
                .insert("venues".to_owned(), CacheValue::Venues(venues.clone()))
                .await;
        }

        Ok(venues)
    }

    /// Get a venue by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the venue is not found or the request fails.
    #[instrument(skip(self), fields(venue_id = %venue_id))]
    pub async fn venue(&self, venue_id: &VenueId) -> Result<Venue, ApiError> {
        let cache_key = format!("venue:{venue_id}");

        if let Some(CacheValue::Venue(venue)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for venue");
            return Ok(*venue);
        }

        let raw: RawVenue = self.get_json(&format!("/venues/{venue_id}"), &[]).await?;
        let venue = convert_venue(raw)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Venue(Box::new(venue.clone())))
            .await;

        Ok(venue)
    }

    /// Find venues within `radius_km` of a point. Results carry a
    /// `distance` field and are sorted nearest-first by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn nearby_venues(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<Venue>, ApiError> {
        let query = [
            ("lat", lat.to_string()),
            ("lng", lng.to_string()),
            ("radius", radius_km.to_string()),
        ];
        let raw: Vec<RawVenue> = self.get_json("/venues/nearby/search", &query).await?;
        raw.into_iter().map(convert_venue).collect()
    }

    /// Create a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_venue(&self, input: &VenueCreate) -> Result<Venue, ApiError> {
        let raw: RawVenue = self.post_json("/venues", input).await?;
        let venue = convert_venue(raw)?;
        self.inner.cache.invalidate("venues").await;
        Ok(venue)
    }

    // =========================================================================
    // Event Methods
    // =========================================================================

    /// List events, optionally filtered, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn events(&self, filter: &EventFilter) -> Result<Vec<Event>, ApiError> {
        if filter.is_empty()
            && let Some(CacheValue::Events(events)) = self.inner.cache.get("events").await
        {
            debug!("Cache hit for events");
            return Ok(events);
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(event_type) = filter.event_type {
            query.push((
                "event_type",
                match event_type {
                    types::EventKind::Playdate => "playdate".to_owned(),
                    types::EventKind::VenueEvent => "venue_event".to_owned(),
                },
            ));
        }
        if let Some(is_public) = filter.is_public {
            query.push(("is_public", is_public.to_string()));
        }
        if let Some(host_id) = &filter.host_id {
            query.push(("host_id", host_id.to_string()));
        }

        let raw: Vec<RawEvent> = self.get_json("/events", &query).await?;
        let events = raw
            .into_iter()
            .map(convert_event)
            .collect::<Result<Vec<_>, _>>()?;

        if filter.is_empty() {
            self.inner
                .cache
                .insert("events".to_owned(), CacheValue::Events(events.clone()))
                .await;
        }

        Ok(events)
    }

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or the request fails.
    #[instrument(skip(self), fields(event_id = %event_id))]
    pub async fn event(&self, event_id: &EventId) -> Result<Event, ApiError> {
        let cache_key = format!("event:{event_id}");

        if let Some(CacheValue::Event(event)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for event");
            return Ok(*event);
        }

        let raw: RawEvent = self.get_json(&format!("/events/{event_id}"), &[]).await?;
        let event = convert_event(raw)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Event(Box::new(event.clone())))
            .await;

        Ok(event)
    }

    /// Create an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_event(&self, input: &EventCreate) -> Result<Event, ApiError> {
        let raw: RawEvent = self.post_json("/events", input).await?;
        let event = convert_event(raw)?;
        self.inner.cache.invalidate("events").await;
        Ok(event)
    }

    /// RSVP to an event. Re-submitting updates the existing RSVP.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, rsvp), fields(event_id = %event_id, status = ?rsvp.status))]
    pub async fn rsvp(&self, event_id: &EventId, rsvp: &RsvpRequest) -> Result<(), ApiError> {
        self.post_unit(&format!("/events/{event_id}/rsvp"), rsvp)
            .await?;
        // Participant counts changed
        self.inner
            .cache
            .invalidate(&format!("event:{event_id}"))
            .await;
        self.inner.cache.invalidate("events").await;
        Ok(())
    }

    /// List accepted attendees of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(event_id = %event_id))]
    pub async fn attendees(&self, event_id: &EventId) -> Result<Vec<Attendee>, ApiError> {
        self.get_json(&format!("/events/{event_id}/attendees"), &[])
            .await
    }

    // =========================================================================
    // Community Methods (not cached - feed freshness matters)
    // =========================================================================

    /// List community posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn posts(&self) -> Result<Vec<Post>, ApiError> {
        let raw: Vec<RawPost> = self.get_json("/posts", &[]).await?;
        raw.into_iter().map(convert_post).collect()
    }

    /// Create a community post.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(post_type = %input.post_type))]
    pub async fn create_post(&self, input: &PostCreate) -> Result<Post, ApiError> {
        let raw: RawPost = self.post_json("/posts", input).await?;
        convert_post(raw)
    }

    // =========================================================================
    // Review & Booking Methods
    // =========================================================================

    /// List reviews for a venue, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(venue_id = %venue_id))]
    pub async fn venue_reviews(&self, venue_id: &VenueId) -> Result<Vec<Review>, ApiError> {
        self.get_json(&format!("/reviews/venue/{venue_id}"), &[])
            .await
    }

    /// Create a review. The server recomputes the venue's average rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(rating = input.rating))]
    pub async fn create_review(&self, input: &ReviewCreate) -> Result<Review, ApiError> {
        let review: Review = self.post_json("/reviews", input).await?;

        // The venue's rating and review count are now stale
        if let Some(venue_id) = &input.venue_id {
            self.inner
                .cache
                .invalidate(&format!("venue:{venue_id}"))
                .await;
            self.inner.cache.invalidate("venues").await;
        }

        Ok(review)
    }

    /// Create a booking. The server assigns status and a ticket code.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_booking(&self, input: &BookingCreate) -> Result<Booking, ApiError> {
        self.post_json("/bookings", input).await
    }

    /// List a user's bookings, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn user_bookings(&self, user_id: &UserId) -> Result<Vec<Booking>, ApiError> {
        self.get_json(&format!("/bookings/user/{user_id}"), &[])
            .await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

impl FavoriteSync for ApiClient {
    /// `POST /favorites/add` with the denormalized snapshot.
    #[instrument(skip(self, entry), fields(item_id = %entry.item_id))]
    async fn push_add(&self, user_id: &UserId, entry: &FavoriteEntry) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "user_id": user_id,
            "item_id": entry.item_id,
            "item_type": entry.item_type,
            "item_data": entry.item_data,
        });
        self.post_unit("/favorites/add", &body).await
    }

    /// `POST /favorites/remove`.
    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn push_remove(&self, user_id: &UserId, item_id: &ItemId) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "user_id": user_id,
            "item_id": item_id,
        });
        self.post_unit("/favorites/remove", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("/venues/v1".to_string());
        assert_eq!(err.to_string(), "Not found: /venues/v1");

        let err = ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/".to_string(),
            timeout: Duration::from_secs(30),
        };
        let client = ApiClient::new(&config).expect("client should build");
        assert_eq!(client.inner.base_url, "http://localhost:8000/api");
    }
}
