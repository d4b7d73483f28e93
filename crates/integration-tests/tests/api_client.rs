//! `ApiClient` tests against the stub backend: payload normalization
//! over the wire, caching, and error mapping.

use std::time::Duration;

use famigo_client::api::types::{EventFilter, VenueFilter};
use famigo_client::api::{ApiClient, ApiError};
use famigo_core::VenueId;
use famigo_integration_tests::TestApi;
use serde_json::json;

fn api_client(base_url: &str) -> ApiClient {
    ApiClient::new(&famigo_client::config::ApiConfig {
        base_url: base_url.to_owned(),
        timeout: Duration::from_secs(5),
    })
    .expect("client should build")
}

#[tokio::test]
async fn test_legacy_mongo_payload_is_normalized() {
    let api = TestApi::spawn().await;
    api.seed_venue(json!({
        "_id": "64ff001a",
        "title": "Science Gallery",
        "category": "Learning",
        "location": {"city": "Melbourne"},
        "rating": 4.5
    }));

    let client = api_client(&api.base_url);
    let venues = client
        .venues(&VenueFilter::default())
        .await
        .expect("list venues");

    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].id.as_str(), "64ff001a");
    // `title` fell back into the canonical `name` field
    assert_eq!(venues[0].name, "Science Gallery");
}

#[tokio::test]
async fn test_venue_lookup_by_legacy_id() {
    let api = TestApi::spawn().await;
    api.seed_venue(json!({
        "_id": "64ff001a",
        "name": "City Farm",
        "category": "Farm",
        "location": {"city": "Melbourne"}
    }));

    let client = api_client(&api.base_url);
    let venue = client
        .venue(&VenueId::new("64ff001a"))
        .await
        .expect("get venue");
    assert_eq!(venue.name, "City Farm");
}

#[tokio::test]
async fn test_unknown_venue_is_not_found() {
    let api = TestApi::spawn().await;
    let client = api_client(&api.base_url);

    let result = client.venue(&VenueId::new("missing")).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_unfiltered_venue_list_is_cached() {
    let api = TestApi::spawn().await;
    api.seed_venue(json!({
        "id": "v1",
        "name": "Playground",
        "category": "Outdoor",
        "location": {"city": "Melbourne"}
    }));

    let client = api_client(&api.base_url);
    assert_eq!(
        client.venues(&VenueFilter::default()).await.expect("list").len(),
        1
    );

    // The second seed is invisible while the cached list is live
    api.seed_venue(json!({
        "id": "v2",
        "name": "Museum",
        "category": "Indoor",
        "location": {"city": "Melbourne"}
    }));
    assert_eq!(
        client.venues(&VenueFilter::default()).await.expect("list").len(),
        1
    );

    client.invalidate_all().await;
    assert_eq!(
        client.venues(&VenueFilter::default()).await.expect("list").len(),
        2
    );
}

#[tokio::test]
async fn test_events_require_mandatory_fields() {
    let api = TestApi::spawn().await;
    api.seed_event(json!({
        "id": "e1",
        "title": "Park playdate",
        "event_type": "playdate",
        "date": "2026-09-01T10:00:00Z",
        "host_id": "u1",
        "host_name": "Alex",
        "max_participants": 6,
        "location": {"city": "Melbourne"}
    }));

    let client = api_client(&api.base_url);
    let events = client
        .events(&EventFilter::default())
        .await
        .expect("list events");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Park playdate");
    assert_eq!(events[0].host_id.as_str(), "u1");
    // Defaults applied during normalization
    assert!(events[0].is_public);
}
