//! Favorites commands.
//!
//! Adding a favorite fetches the item first so its display snapshot
//! (title, location, image) is captured at favorite-time.

use clap::ValueEnum;
use tracing::info;

use famigo_client::api::ApiClient;
use famigo_core::{EventId, ItemId, ItemKind, VenueId};

use super::Store;

/// CLI-facing item kind.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Venue,
    Event,
}

/// Print all favorites in insertion order.
pub fn list(store: &Store) {
    let favorites = store.favorites();
    if favorites.is_empty() {
        println!("No favorites yet.");
        return;
    }
    for entry in favorites {
        println!(
            "{:<6} {:<24} {}",
            entry.item_type.as_str(),
            entry.item_id,
            entry.item_data.title
        );
    }
}

/// Favorite a venue or event, capturing its current snapshot.
pub async fn add(
    store: &Store,
    api: &ApiClient,
    kind: KindArg,
    item_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let (item_type, snapshot) = match kind {
        KindArg::Venue => {
            let venue = api.venue(&VenueId::new(item_id.clone())).await?;
            (ItemKind::Venue, venue.snapshot())
        }
        KindArg::Event => {
            let event = api.event(&EventId::new(item_id.clone())).await?;
            (ItemKind::Event, event.snapshot())
        }
    };

    store
        .add_favorite(ItemId::new(item_id), item_type, snapshot)
        .await?;
    info!("Favorite added");
    Ok(())
}

/// Remove a favorite. Removing an unknown ID is a quiet success.
pub async fn remove(store: &Store, item_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    store.remove_favorite(&ItemId::new(item_id)).await?;
    info!("Favorite removed");
    Ok(())
}
