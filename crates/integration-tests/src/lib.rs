//! Integration tests for the Famigo client.
//!
//! Tests in `tests/` run the real client stack - `SyncedStore`,
//! `FileStorage`, and `ApiClient` - against [`TestApi`], an in-process
//! stub of the Famigo backend bound to an ephemeral port. The stub
//! records favorite pushes, serves seeded catalog payloads (including
//! legacy Mongo-shaped ones), and can be flipped into a failure mode to
//! exercise rollback.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p famigo-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// Shared state of the stub backend.
#[derive(Default)]
pub struct StubState {
    fail_favorites: AtomicBool,
    favorite_adds: Mutex<Vec<Value>>,
    favorite_removes: Mutex<Vec<Value>>,
    venues: Mutex<Vec<Value>>,
    events: Mutex<Vec<Value>>,
}

/// An in-process stub of the Famigo backend.
pub struct TestApi {
    /// Base URL (without the `/api` suffix; the client appends it).
    pub base_url: String,
    state: Arc<StubState>,
}

impl TestApi {
    /// Bind the stub to an ephemeral local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState::default());

        let router = Router::new()
            .route("/api/venues", get(list_venues))
            .route("/api/venues/{venue_id}", get(get_venue))
            .route("/api/events", get(list_events))
            .route("/api/favorites/add", post(favorite_add))
            .route("/api/favorites/remove", post(favorite_remove))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Add a raw venue payload to the catalog, exactly as the server
    /// would send it (so legacy `_id`/`title` shapes are fair game).
    pub fn seed_venue(&self, venue: Value) {
        lock(&self.state.venues).push(venue);
    }

    /// Add a raw event payload to the catalog.
    pub fn seed_event(&self, event: Value) {
        lock(&self.state.events).push(event);
    }

    /// Make favorite endpoints return 503 until switched back.
    pub fn fail_favorites(&self, fail: bool) {
        self.state.fail_favorites.store(fail, Ordering::SeqCst);
    }

    /// Bodies received on `/api/favorites/add`, in order.
    #[must_use]
    pub fn favorite_adds(&self) -> Vec<Value> {
        lock(&self.state.favorite_adds).clone()
    }

    /// Bodies received on `/api/favorites/remove`, in order.
    #[must_use]
    pub fn favorite_removes(&self) -> Vec<Value> {
        lock(&self.state.favorite_removes).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn list_venues(State(state): State<Arc<StubState>>) -> Json<Value> {
    Json(Value::Array(lock(&state.venues).clone()))
}

async fn get_venue(
    State(state): State<Arc<StubState>>,
    Path(venue_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let venues = lock(&state.venues);
    venues
        .iter()
        .find(|v| {
            v.get("id").and_then(Value::as_str) == Some(venue_id.as_str())
                || v.get("_id").and_then(Value::as_str) == Some(venue_id.as_str())
        })
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_events(State(state): State<Arc<StubState>>) -> Json<Value> {
    Json(Value::Array(lock(&state.events).clone()))
}

async fn favorite_add(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if state.fail_favorites.load(Ordering::SeqCst) {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    lock(&state.favorite_adds).push(body);
    Ok(Json(json!({"status": "ok"})))
}

async fn favorite_remove(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if state.fail_favorites.load(Ordering::SeqCst) {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    lock(&state.favorite_removes).push(body);
    Ok(Json(json!({"status": "ok"})))
}
