//! Cache value types for read-side API responses.

use super::types::{Event, Venue};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Venue(Box<Venue>),
    Venues(Vec<Venue>),
    Event(Box<Event>),
    Events(Vec<Event>),
}
