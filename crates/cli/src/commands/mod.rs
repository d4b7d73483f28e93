//! CLI command implementations.

pub mod discover;
pub mod favorites;
pub mod profile;

use famigo_client::api::ApiClient;
use famigo_client::storage::FileStorage;
use famigo_client::store::SyncedStore;

/// The store type every command operates on.
pub type Store = SyncedStore<FileStorage, ApiClient>;
