//! Core types for the Famigo client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod favorite;
pub mod id;
pub mod location;
pub mod profile;

pub use email::{Email, EmailError};
pub use favorite::{FavoriteEntry, ItemKind, ItemSnapshot};
pub use id::*;
pub use location::{GeoPoint, HomeLocation};
pub use profile::{ProfileError, UserProfile};
