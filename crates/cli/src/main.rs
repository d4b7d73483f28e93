//! Famigo CLI - profile, favorites, and discovery from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Set up a profile
//! famigo profile set --name Alex --city Melbourne --lat -37.8136 --lng 144.9631 --kids-ages 3,7
//!
//! # Browse and favorite
//! famigo venues list --category Playgrounds
//! famigo favorites add venue 64ff001a
//! famigo favorites list
//!
//! # Log out (favorites are kept)
//! famigo profile clear
//! ```
//!
//! # Commands
//!
//! - `profile` - Show, set, or clear the local profile
//! - `favorites` - List, add, or remove favorites (synced to the API)
//! - `venues` / `events` / `posts` - Browse the Famigo catalog

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal output is this binary's job
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use famigo_client::api::ApiClient;
use famigo_client::config::ClientConfig;
use famigo_client::storage::FileStorage;
use famigo_client::store::SyncedStore;

mod commands;

use commands::favorites::KindArg;
use commands::profile::ProfileFields;

#[derive(Parser)]
#[command(name = "famigo")]
#[command(author, version, about = "Famigo family-activity client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the local profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Browse venues
    Venues {
        #[command(subcommand)]
        action: VenuesAction,
    },
    /// Browse events
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },
    /// Show the community feed
    Posts,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the current profile
    Show,
    /// Create or replace the profile
    Set {
        #[command(flatten)]
        fields: ProfileFields,
    },
    /// Clear the profile (favorites are kept)
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List all favorites
    List,
    /// Favorite a venue or event by ID
    Add {
        /// Item kind
        #[arg(value_enum)]
        kind: KindArg,
        /// Item ID
        item_id: String,
    },
    /// Remove a favorite by item ID
    Remove {
        /// Item ID
        item_id: String,
    },
}

#[derive(Subcommand)]
enum VenuesAction {
    /// List venues
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Full-text search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Find venues near a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in kilometres
        #[arg(short, long, default_value_t = 10.0)]
        radius: f64,
    },
    /// Show one venue
    Show {
        /// Venue ID
        venue_id: String,
    },
}

#[derive(Subcommand)]
enum EventsAction {
    /// List upcoming events
    List,
    /// Show one event
    Show {
        /// Event ID
        event_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let storage = FileStorage::new(&config.data_dir);
    let api = ApiClient::new(&config.api)?;
    let store = SyncedStore::open(storage, api.clone()).await;

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&store),
            ProfileAction::Set { fields } => commands::profile::set(&store, fields).await?,
            ProfileAction::Clear => commands::profile::clear(&store).await?,
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(&store),
            FavoritesAction::Add { kind, item_id } => {
                commands::favorites::add(&store, &api, kind, item_id).await?;
            }
            FavoritesAction::Remove { item_id } => {
                commands::favorites::remove(&store, &item_id).await?;
            }
        },
        Commands::Venues { action } => match action {
            VenuesAction::List { category, search } => {
                commands::discover::venues(&api, category, search).await?;
            }
            VenuesAction::Nearby { lat, lng, radius } => {
                commands::discover::nearby_venues(&api, lat, lng, radius).await?;
            }
            VenuesAction::Show { venue_id } => {
                commands::discover::venue(&api, &venue_id).await?;
            }
        },
        Commands::Events { action } => match action {
            EventsAction::List => commands::discover::events(&api).await?,
            EventsAction::Show { event_id } => commands::discover::event(&api, &event_id).await?,
        },
        Commands::Posts => commands::discover::posts(&api).await?,
    }
    Ok(())
}
