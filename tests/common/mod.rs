#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;

use city_events_server::routes::create_routes;
use city_events_server::seed;
use city_events_server::state::AppState;
use city_events_server::store::{MemoryStore, TicketStore};

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Router over a fresh in-memory store holding the demo fixture.
pub async fn seeded_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    seed::apply(store.as_ref(), seed::demo_fixture().expect("fixture"))
        .await
        .expect("seed");
    let app = create_routes(AppState::new(store.clone() as Arc<dyn TicketStore>), static_dir());
    (app, store)
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    raw_json_request(method, uri, body.to_string())
}

pub fn raw_json_request(method: &str, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .expect("request")
}
