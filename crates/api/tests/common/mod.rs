#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use fractional_site_api::config::AppConfig;
use fractional_site_api::state::AppState;
use fractional_site_core::store::MemoryContentStore;
use fractional_site_core::{ContentStore, StoreError};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "webhook-secret";

pub const FIXTURES: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../core/tests/fixtures/insights.ndjson"
);

/// Store that always fails, standing in for an unreachable content lake.
pub struct UnreachableStore;

#[async_trait]
impl ContentStore for UnreachableStore {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn query(&self, _query: &str, _params: &Value) -> Result<Value, StoreError> {
        Err(StoreError::Config("connection refused".into()))
    }
}

pub fn config() -> AppConfig {
    AppConfig {
        site_name: "Test CFO".into(),
        sanity_project_id: Some("proj1".into()),
        revalidate_secret: Some(SECRET.into()),
        ..AppConfig::default()
    }
}

pub async fn fixture_state() -> AppState {
    let store = MemoryContentStore::load(FIXTURES)
        .await
        .expect("fixtures should load");
    AppState::new(config(), Arc::new(store))
}

pub fn empty_state() -> AppState {
    AppState::new(config(), Arc::new(MemoryContentStore::default()))
}

pub fn unreachable_state() -> AppState {
    AppState::new(config(), Arc::new(UnreachableStore))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("body should be utf-8")
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("body should be json")
    }

    pub fn cache_status(&self) -> Option<&str> {
        self.headers.get("x-cache").and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Body) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    TestResponse {
        status,
        headers,
        body: body.to_vec(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn post(app: &Router, uri: &str, body: &str) -> TestResponse {
    send(app, Method::POST, uri, Body::from(body.to_string())).await
}

/// Put a page in the cache as a finished render would.
pub async fn seed(state: &AppState, path: &str, body: &str) {
    let generation = state.cache().generation(path).await;
    state
        .cache()
        .insert_if_generation(path, generation, body.to_string())
        .await;
}
