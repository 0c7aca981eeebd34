#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use staybook_api::config::{LogFormat, ServerConfig, StorageBackend};
use staybook_api::router::build_app_router;
use staybook_api::state::AppState;
use staybook_core::types::DbId;
use staybook_db::memory::MemoryStore;
use staybook_db::models::unit::CreateUnit;
use staybook_db::store::UnitStore;

/// Build a test `ServerConfig` with safe defaults and the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        storage: StorageBackend::Memory,
        database: None,
        log_format: LogFormat::Text,
    }
}

/// Application state over a fresh in-memory store. The returned store
/// shares its data with the state.
pub fn test_state() -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    (AppState::memory(test_config(), store.clone()), store)
}

/// Build the full application router with all middleware layers, exactly
/// as `main.rs` does, over a fresh in-memory store.
pub fn build_test_app() -> (Router, MemoryStore) {
    let (state, store) = test_state();
    let app = build_app_router(state).unwrap();
    (app, store)
}

pub async fn seed_unit(store: &MemoryStore) -> DbId {
    store
        .create_unit(&CreateUnit {
            name: "Seaside Cottage".into(),
            nightly_price: Decimal::new(11000, 2),
            currency: "EUR".into(),
            max_guests: 4,
        })
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

pub fn booking_body(unit_id: DbId, start: &str, end: &str) -> Value {
    json!({
        "unit_id": unit_id,
        "start_date": start,
        "end_date": end,
        "is_blocked": false,
        "guest_name": "Ada Lovelace",
        "guest_phone": "+44 20 7946 0000",
        "guest_email": "ada@example.com",
        "guest_sex": "female",
        "client_type": "individual",
        "guest_count": 2,
        "nights": 4,
        "per_night": "110.00",
        "subtotal": "440.00",
        "service_fee": "22.00",
        "total": "462.00",
        "currency": "EUR"
    })
}

pub fn block_body(unit_id: DbId, start: &str, end: &str) -> Value {
    json!({
        "unit_id": unit_id,
        "start_date": start,
        "end_date": end,
        "is_blocked": true,
        "notes": "maintenance"
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

/// POST a raw, possibly malformed, JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
