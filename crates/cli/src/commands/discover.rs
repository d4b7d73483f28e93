//! Discovery commands: venues, events, and the community feed.

use famigo_client::api::ApiClient;
use famigo_client::api::types::{EventFilter, VenueFilter};
use famigo_core::{EventId, VenueId};

/// List venues, optionally filtered.
pub async fn venues(
    api: &ApiClient,
    category: Option<String>,
    search: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = VenueFilter {
        category,
        search,
        ..VenueFilter::default()
    };
    let venues = api.venues(&filter).await?;

    if venues.is_empty() {
        println!("No venues found.");
        return Ok(());
    }
    for venue in venues {
        println!(
            "{:<24} {:<16} {:<20} {:.1}★ ({})",
            venue.id,
            venue.category,
            venue.name,
            venue.rating,
            venue.total_reviews
        );
    }
    Ok(())
}

/// List venues near a point, nearest first.
pub async fn nearby_venues(
    api: &ApiClient,
    lat: f64,
    lng: f64,
    radius_km: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let venues = api.nearby_venues(lat, lng, radius_km).await?;

    if venues.is_empty() {
        println!("No venues within {radius_km} km.");
        return Ok(());
    }
    for venue in venues {
        let distance = venue
            .distance
            .map_or_else(|| "?".to_owned(), |d| format!("{d:.1} km"));
        println!("{:<8} {:<24} {}", distance, venue.id, venue.name);
    }
    Ok(())
}

/// Show one venue in full.
pub async fn venue(api: &ApiClient, venue_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let venue = api.venue(&VenueId::new(venue_id)).await?;

    println!("{}", venue.name);
    println!("Category:  {}", venue.category);
    println!("City:      {}", venue.location.city);
    println!("Rating:    {:.1} ({} reviews)", venue.rating, venue.total_reviews);
    println!("Ages:      {}-{}", venue.age_range.min, venue.age_range.max);
    if !venue.facilities.is_empty() {
        println!("Facilities: {}", venue.facilities.join(", "));
    }
    if !venue.description.is_empty() {
        println!("\n{}", venue.description);
    }
    Ok(())
}

/// List upcoming events, soonest first.
pub async fn events(api: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let events = api.events(&EventFilter::default()).await?;

    if events.is_empty() {
        println!("No upcoming events.");
        return Ok(());
    }
    for event in events {
        println!(
            "{:<24} {:<16} {:<24} {}/{}",
            event.id,
            event.date.format("%Y-%m-%d %H:%M"),
            event.title,
            event.current_participants,
            event.max_participants
        );
    }
    Ok(())
}

/// Show one event in full.
pub async fn event(api: &ApiClient, event_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let event = api.event(&EventId::new(event_id)).await?;

    println!("{}", event.title);
    println!("When:      {}", event.date.format("%Y-%m-%d %H:%M"));
    println!("Where:     {}", event.location.city);
    println!("Host:      {}", event.host_name);
    println!(
        "Capacity:  {}/{}",
        event.current_participants, event.max_participants
    );
    if !event.description.is_empty() {
        println!("\n{}", event.description);
    }
    Ok(())
}

/// Show the community feed, newest first.
pub async fn posts(api: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let posts = api.posts().await?;

    if posts.is_empty() {
        println!("The feed is empty.");
        return Ok(());
    }
    for post in posts {
        println!(
            "[{}] {} ({} likes)",
            post.user_name, post.content, post.likes
        );
    }
    Ok(())
}
