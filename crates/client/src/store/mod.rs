//! The profile/favorites store: the in-process source of truth for the
//! current user's durable client state.
//!
//! # Architecture
//!
//! - One explicit [`SyncedStore`] instance is constructed at startup via
//!   [`SyncedStore::open`] and handed to consumers; there is no ambient
//!   global state
//! - Reads (`profile`, `favorites`, `is_favorite`) are synchronous
//!   against in-memory state
//! - Mutations apply optimistically in memory, persist the full
//!   serialized value to durable storage, then push to the remote API
//!   through [`FavoriteSync`]; a remote failure rolls the optimistic
//!   change back and surfaces [`StoreError::Sync`]
//! - All mutations serialize through one async lock held for the whole
//!   three-phase sequence, so operations on the same item apply in
//!   invocation order and a late remote completion can never resurrect
//!   a removed favorite
//!
//! # Consistency
//!
//! Every persisted write is a complete freshly-serialized value for its
//! key, so local storage always holds either the previous or the next
//! state, never a blend. At most one favorite entry exists per item at
//! any time, regardless of call interleaving: a duplicate add is
//! coalesced into a no-op success before any remote call is issued.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use famigo_core::{FavoriteEntry, ItemId, ItemKind, ItemSnapshot, UserId, UserProfile};

use crate::api::ApiError;
use crate::storage::{KeyValueStorage, StorageError};

/// Storage key for the serialized profile.
pub const PROFILE_KEY: &str = "famigo_user";
/// Storage key for the serialized favorites collection.
pub const FAVORITES_KEY: &str = "famigo_favorites";

/// Remote side of favorite synchronization.
///
/// Implemented by [`crate::api::ApiClient`]; tests substitute their own
/// implementation to inject failures.
pub trait FavoriteSync: Send + Sync {
    /// Push a newly created favorite to the remote system.
    fn push_add(
        &self,
        user_id: &UserId,
        entry: &FavoriteEntry,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Push a favorite removal to the remote system.
    fn push_remove(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Errors surfaced by store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A favorite mutation was attempted without a profile. Recoverable:
    /// prompt the user to complete onboarding.
    #[error("not authenticated: complete a profile before favoriting")]
    NotAuthenticated,

    /// Durable local storage failed. The in-memory state carries on in a
    /// degraded (non-persisted) mode; the caller must tell the user the
    /// change will not survive a restart.
    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// The remote call failed and the optimistic local change has been
    /// rolled back.
    #[error("sync error: {0}")]
    Sync(#[from] ApiError),
}

/// In-memory state guarded by the state mutex.
#[derive(Debug, Default)]
struct State {
    profile: Option<UserProfile>,
    favorites: Vec<FavoriteEntry>,
}

/// The profile/favorites store. Cheap to clone; clones share state.
pub struct SyncedStore<S, R> {
    inner: Arc<StoreInner<S, R>>,
}

impl<S, R> Clone for SyncedStore<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<S, R> {
    /// Fast synchronous reads; held only for memory access, never across
    /// an await point.
    state: Mutex<State>,
    /// Serializes mutations end to end (memory + persist + remote).
    op_lock: tokio::sync::Mutex<()>,
    storage: S,
    sync: R,
}

impl<S, R> SyncedStore<S, R>
where
    S: KeyValueStorage,
    R: FavoriteSync,
{
    /// Open the store, loading any persisted state.
    ///
    /// This is the readiness gate: await it once at startup before any
    /// consumer reads profile or favorites. Missing or corrupt stored
    /// data leaves the corresponding state empty - it is logged but
    /// never fails startup.
    #[instrument(skip_all)]
    pub async fn open(storage: S, sync: R) -> Self {
        let profile: Option<UserProfile> = load_stored(&storage, PROFILE_KEY).await;
        let favorites: Vec<FavoriteEntry> = load_stored(&storage, FAVORITES_KEY)
            .await
            .unwrap_or_default();

        debug!(
            has_profile = profile.is_some(),
            favorites = favorites.len(),
            "store loaded"
        );

        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(State { profile, favorites }),
                op_lock: tokio::sync::Mutex::new(()),
                storage,
                sync,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a panicked reader; the state itself
        // is still coherent because it is only replaced wholesale.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Queries (synchronous, side-effect free)
    // =========================================================================

    /// The current profile, if onboarding has completed.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.state().profile.clone()
    }

    /// All favorites in insertion order.
    #[must_use]
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.state().favorites.clone()
    }

    /// Whether `item_id` is currently favorited. Returns `false` for an
    /// empty collection or an unknown ID; never errors.
    #[must_use]
    pub fn is_favorite(&self, item_id: &ItemId) -> bool {
        self.state()
            .favorites
            .iter()
            .any(|entry| &entry.item_id == item_id)
    }

    // =========================================================================
    // Profile Mutations
    // =========================================================================

    /// Replace the profile wholesale and persist it.
    ///
    /// There is no partial-field merge: the caller supplies the complete
    /// record. The save is local-only; the Famigo API has no profile
    /// resource to upsert to.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the durable write failed.
    /// The in-memory profile is updated regardless, so the session keeps
    /// working in a degraded mode.
    #[instrument(skip_all, fields(user_id = %profile.id))]
    pub async fn set_profile(&self, profile: UserProfile) -> Result<(), StoreError> {
        let _op = self.inner.op_lock.lock().await;

        let serialized = serde_json::to_string(&profile).map_err(StorageError::Serialize)?;
        self.state().profile = Some(profile);

        self.inner.storage.set(PROFILE_KEY, &serialized).await?;
        // Local-only: the Famigo API has no profile resource to push to
        debug!("profile persisted");
        Ok(())
    }

    /// Clear the profile (logout) and remove it from durable storage.
    ///
    /// Favorites are deliberately left untouched so they survive a
    /// re-login with the same identity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the stored profile could
    /// not be removed; the in-memory profile is cleared regardless.
    #[instrument(skip(self))]
    pub async fn clear_profile(&self) -> Result<(), StoreError> {
        let _op = self.inner.op_lock.lock().await;

        self.state().profile = None;
        self.inner.storage.remove(PROFILE_KEY).await?;
        Ok(())
    }

    // =========================================================================
    // Favorite Mutations
    // =========================================================================

    /// Favorite an item, capturing `item_data` as its display snapshot.
    ///
    /// Optimistic three-phase mutation: snapshot prior state, apply in
    /// memory and persist, then push to the remote API. A remote failure
    /// restores the prior state (memory and storage) before returning.
    /// Favoriting an already-favorited item is a no-op success, which
    /// also coalesces rapid duplicate calls into a single remote request.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotAuthenticated`] if no profile exists; the
    ///   collection is untouched.
    /// - [`StoreError::Sync`] if the remote call failed; the optimistic
    ///   change has been rolled back.
    /// - [`StoreError::Persistence`] if the remote call succeeded but the
    ///   local write did not; memory is updated, storage is stale.
    #[instrument(skip(self, item_data), fields(item_id = %item_id, kind = ?item_type))]
    pub async fn add_favorite(
        &self,
        item_id: ItemId,
        item_type: ItemKind,
        item_data: ItemSnapshot,
    ) -> Result<(), StoreError> {
        let _op = self.inner.op_lock.lock().await;

        let user_id = self
            .state()
            .profile
            .as_ref()
            .map(|p| p.id.clone())
            .ok_or(StoreError::NotAuthenticated)?;

        if self.is_favorite(&item_id) {
            debug!("already favorited, coalescing");
            return Ok(());
        }

        let entry = FavoriteEntry::new(&user_id, item_id, item_type, item_data);

        // Phase 1+2: snapshot prior state, apply optimistically, persist
        let prior = {
            let mut state = self.state();
            let prior = state.favorites.clone();
            state.favorites.push(entry.clone());
            prior
        };
        let persist_failure = self.persist_favorites().await.err();
        if let Some(e) = &persist_failure {
            warn!(error = %e, "favorites not persisted, continuing in memory");
        }

        // Phase 3: remote sync, rolling back on failure
        match self.inner.sync.push_add(&user_id, &entry).await {
            Ok(()) => persist_failure.map_or(Ok(()), |e| Err(StoreError::Persistence(e))),
            Err(sync_err) => {
                warn!(error = %sync_err, "remote add failed, rolling back");
                self.restore_favorites(prior, persist_failure.is_none())
                    .await;
                Err(StoreError::Sync(sync_err))
            }
        }
    }

    /// Unfavorite an item.
    ///
    /// Removing an item that is not favorited is a no-op success. The
    /// rollback contract matches [`Self::add_favorite`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotAuthenticated`] if no profile exists.
    /// - [`StoreError::Sync`] if the remote call failed; the entry has
    ///   been restored.
    /// - [`StoreError::Persistence`] if the remote call succeeded but the
    ///   local write did not.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_favorite(&self, item_id: &ItemId) -> Result<(), StoreError> {
        let _op = self.inner.op_lock.lock().await;

        let user_id = self
            .state()
            .profile
            .as_ref()
            .map(|p| p.id.clone())
            .ok_or(StoreError::NotAuthenticated)?;

        if !self.is_favorite(item_id) {
            debug!("not favorited, nothing to remove");
            return Ok(());
        }

        let prior = {
            let mut state = self.state();
            let prior = state.favorites.clone();
            state.favorites.retain(|entry| &entry.item_id != item_id);
            prior
        };
        let persist_failure = self.persist_favorites().await.err();
        if let Some(e) = &persist_failure {
            warn!(error = %e, "favorites not persisted, continuing in memory");
        }

        match self.inner.sync.push_remove(&user_id, item_id).await {
            Ok(()) => persist_failure.map_or(Ok(()), |e| Err(StoreError::Persistence(e))),
            Err(sync_err) => {
                warn!(error = %sync_err, "remote remove failed, rolling back");
                self.restore_favorites(prior, persist_failure.is_none())
                    .await;
                Err(StoreError::Sync(sync_err))
            }
        }
    }

    // =========================================================================
    // Persistence helpers
    // =========================================================================

    /// Write the complete current favorites collection to storage.
    async fn persist_favorites(&self) -> Result<(), StorageError> {
        let serialized = {
            let state = self.state();
            serde_json::to_string(&state.favorites)?
        };
        self.inner.storage.set(FAVORITES_KEY, &serialized).await
    }

    /// Restore a prior favorites snapshot after a failed remote call.
    async fn restore_favorites(&self, prior: Vec<FavoriteEntry>, re_persist: bool) {
        self.state().favorites = prior;
        // If the optimistic persist already failed, storage still holds
        // the prior state and there is nothing to undo.
        if re_persist
            && let Err(e) = self.persist_favorites().await
        {
            warn!(error = %e, "failed to re-persist favorites after rollback");
        }
    }
}

/// Load and deserialize a stored value, treating missing or malformed
/// data as absent.
async fn load_stored<T: DeserializeOwned>(
    storage: &impl KeyValueStorage,
    key: &str,
) -> Option<T> {
    match storage.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding malformed stored data");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "failed to read stored data");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use famigo_core::{GeoPoint, HomeLocation};

    use super::*;
    use crate::storage::MemoryStorage;

    /// Recording mock for the remote side, with failure injection.
    #[derive(Clone, Default)]
    struct MockSync {
        fail: Arc<AtomicBool>,
        adds: Arc<AtomicUsize>,
        removes: Arc<AtomicUsize>,
    }

    impl MockSync {
        fn failing() -> Self {
            let sync = Self::default();
            sync.fail.store(true, Ordering::SeqCst);
            sync
        }
    }

    impl FavoriteSync for MockSync {
        async fn push_add(&self, _user: &UserId, _entry: &FavoriteEntry) -> Result<(), ApiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Api {
                    status: 503,
                    message: "unavailable".to_owned(),
                });
            }
            self.adds.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn push_remove(&self, _user: &UserId, _item: &ItemId) -> Result<(), ApiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Api {
                    status: 503,
                    message: "unavailable".to_owned(),
                });
            }
            self.removes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Storage whose writes can be made to fail.
    #[derive(Clone, Default)]
    struct FlakyStorage {
        backing: MemoryStorage,
        fail_writes: Arc<AtomicBool>,
    }

    impl KeyValueStorage for FlakyStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.backing.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.backing.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.backing.remove(key).await
        }
    }

    fn alex() -> UserProfile {
        let mut profile = UserProfile::new(
            "Alex",
            HomeLocation::new("Melbourne", GeoPoint::new(-37.8136, 144.9631)),
        )
        .unwrap();
        profile.kids_ages = vec![3, 7];
        profile
    }

    fn snapshot(title: &str) -> ItemSnapshot {
        ItemSnapshot {
            title: title.to_owned(),
            location: None,
            image: None,
        }
    }

    async fn store_with_profile(
        storage: MemoryStorage,
        sync: MockSync,
    ) -> SyncedStore<MemoryStorage, MockSync> {
        let store = SyncedStore::open(storage, sync).await;
        store.set_profile(alex()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_profile_roundtrip_across_restart() {
        let storage = MemoryStorage::new();
        let profile = alex();

        {
            let store = SyncedStore::open(storage.clone(), MockSync::default()).await;
            store.set_profile(profile.clone()).await.unwrap();
        }

        // Fresh open over the same storage simulates a process restart
        let store = SyncedStore::open(storage, MockSync::default()).await;
        assert_eq!(store.profile().unwrap(), profile);
    }

    #[tokio::test]
    async fn test_open_with_empty_storage_is_empty() {
        let store = SyncedStore::open(MemoryStorage::new(), MockSync::default()).await;
        assert!(store.profile().is_none());
        assert!(store.favorites().is_empty());
        assert!(!store.is_favorite(&ItemId::new("anything")));
    }

    #[tokio::test]
    async fn test_open_tolerates_corrupt_stored_data() {
        let storage = MemoryStorage::new();
        storage.seed(PROFILE_KEY, "{not json");
        storage.seed(FAVORITES_KEY, "42");

        let store = SyncedStore::open(storage, MockSync::default()).await;
        assert!(store.profile().is_none());
        assert!(store.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_is_favorite() {
        let sync = MockSync::default();
        let store = store_with_profile(MemoryStorage::new(), sync.clone()).await;

        store
            .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
            .await
            .unwrap();

        assert!(store.is_favorite(&ItemId::new("v1")));
        assert_eq!(sync.adds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_then_not_favorite() {
        let store = store_with_profile(MemoryStorage::new(), MockSync::default()).await;

        store
            .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
            .await
            .unwrap();
        store.remove_favorite(&ItemId::new("v1")).await.unwrap();

        assert!(!store.is_favorite(&ItemId::new("v1")));
        assert!(store.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_double_add_is_coalesced() {
        let sync = MockSync::default();
        let store = store_with_profile(MemoryStorage::new(), sync.clone()).await;

        store
            .add_favorite(ItemId::new("e1"), ItemKind::Event, snapshot("Picnic"))
            .await
            .unwrap();
        store
            .add_favorite(ItemId::new("e1"), ItemKind::Event, snapshot("Picnic again"))
            .await
            .unwrap();

        assert_eq!(store.favorites().len(), 1);
        // The duplicate never reached the remote system
        assert_eq!(sync.adds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_leave_one_entry() {
        let sync = MockSync::default();
        let store = store_with_profile(MemoryStorage::new(), sync.clone()).await;

        // Two rapid toggles for the same item id from distinct item objects
        let a = store.add_favorite(ItemId::new("e1"), ItemKind::Event, snapshot("From feed"));
        let b = store.add_favorite(ItemId::new("e1"), ItemKind::Event, snapshot("From detail"));
        let (ra, rb) = tokio::join!(a, b);

        ra.unwrap();
        rb.unwrap();
        assert_eq!(store.favorites().len(), 1);
        assert_eq!(sync.adds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop_success() {
        let sync = MockSync::default();
        let store = store_with_profile(MemoryStorage::new(), sync.clone()).await;

        store.remove_favorite(&ItemId::new("ghost")).await.unwrap();
        assert!(store.favorites().is_empty());
        assert_eq!(sync.removes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_without_profile_is_not_authenticated() {
        let store = SyncedStore::open(MemoryStorage::new(), MockSync::default()).await;

        let result = store
            .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
            .await;

        assert!(matches!(result, Err(StoreError::NotAuthenticated)));
        assert!(store.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_clear_profile_keeps_favorites() {
        let storage = MemoryStorage::new();
        let store = store_with_profile(storage.clone(), MockSync::default()).await;

        store
            .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
            .await
            .unwrap();
        store.clear_profile().await.unwrap();

        assert!(store.profile().is_none());
        assert_eq!(store.favorites().len(), 1);
        // Durable storage agrees: profile gone, favorites intact
        assert!(storage.peek(PROFILE_KEY).is_none());
        assert!(storage.peek(FAVORITES_KEY).is_some());
    }

    #[tokio::test]
    async fn test_add_rolls_back_on_sync_failure() {
        let storage = MemoryStorage::new();
        let store = store_with_profile(storage.clone(), MockSync::failing()).await;

        let result = store
            .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
            .await;

        assert!(matches!(result, Err(StoreError::Sync(_))));
        assert!(!store.is_favorite(&ItemId::new("v1")));
        // Storage holds the restored (empty) collection
        let stored: Vec<FavoriteEntry> =
            serde_json::from_str(&storage.peek(FAVORITES_KEY).unwrap()).unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_remove_rolls_back_on_sync_failure() {
        let sync = MockSync::default();
        let store = store_with_profile(MemoryStorage::new(), sync.clone()).await;

        store
            .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
            .await
            .unwrap();

        sync.fail.store(true, Ordering::SeqCst);
        let result = store.remove_favorite(&ItemId::new("v1")).await;

        assert!(matches!(result, Err(StoreError::Sync(_))));
        assert!(store.is_favorite(&ItemId::new("v1")));
    }

    #[tokio::test]
    async fn test_persist_failure_is_degraded_not_rolled_back() {
        let storage = FlakyStorage::default();
        let sync = MockSync::default();
        let store = SyncedStore::open(storage.clone(), sync.clone()).await;
        store.set_profile(alex()).await.unwrap();

        storage.fail_writes.store(true, Ordering::SeqCst);
        let result = store
            .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
            .await;

        // Caller is told persistence failed, but the favorite stands and
        // the remote system was updated
        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert!(store.is_favorite(&ItemId::new("v1")));
        assert_eq!(sync.adds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scenario_alex_melbourne_restart() {
        let storage = MemoryStorage::new();
        {
            let store = SyncedStore::open(storage.clone(), MockSync::default()).await;
            store.set_profile(alex()).await.unwrap();
        }

        let store = SyncedStore::open(storage, MockSync::default()).await;
        let profile = store.profile().unwrap();
        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.home_location.city, "Melbourne");
        assert_eq!(profile.kids_ages, vec![3, 7]);
    }

    #[tokio::test]
    async fn test_favorites_survive_restart() {
        let storage = MemoryStorage::new();
        {
            let store = store_with_profile(storage.clone(), MockSync::default()).await;
            store
                .add_favorite(ItemId::new("v1"), ItemKind::Venue, snapshot("Zoo"))
                .await
                .unwrap();
        }

        let store = SyncedStore::open(storage, MockSync::default()).await;
        assert!(store.is_favorite(&ItemId::new("v1")));
        let entry = store.favorites().into_iter().next().unwrap();
        assert_eq!(entry.item_data.title, "Zoo");
    }
}
