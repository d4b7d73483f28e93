//! Famigo client library.
//!
//! The client-side half of the Famigo family-activity app: a local
//! profile/favorites store with optimistic remote synchronization, plus a
//! typed client for the Famigo REST API.
//!
//! # Architecture
//!
//! - [`store`] - `SyncedStore`: the in-process source of truth for the
//!   current user's profile and favorites. Mutations apply optimistically
//!   in memory, persist to durable local storage, and synchronize with
//!   the remote API; remote failures roll the optimistic change back.
//! - [`storage`] - Durable local key-value adapter (file-backed or
//!   in-memory) behind the [`storage::KeyValueStorage`] trait.
//! - [`api`] - `ApiClient` for venues, events, posts, reviews, bookings,
//!   and the favorite add/remove endpoints. Heterogeneous server payloads
//!   are normalized into strict domain types at this boundary.
//! - [`config`] - Environment-driven configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use famigo_client::api::ApiClient;
//! use famigo_client::config::ClientConfig;
//! use famigo_client::storage::FileStorage;
//! use famigo_client::store::SyncedStore;
//!
//! let config = ClientConfig::from_env()?;
//! let storage = FileStorage::new(&config.data_dir);
//! let api = ApiClient::new(&config.api)?;
//! let store = SyncedStore::open(storage, api.clone()).await;
//!
//! if let Some(profile) = store.profile() {
//!     store.add_favorite(item_id, kind, snapshot).await?;
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ApiError};
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{FavoriteSync, StoreError, SyncedStore};
