use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Full health check. Runs a trivial query against the content store.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let fetcher = state.fetcher();
    fetcher.ping().await.map_err(|e| {
        ApiError::Unavailable(format!("content store health check failed: {e}"))
    })?;

    let cached_pages = state.cache().len().await;
    Ok(Json(json!({
        "status": "ok",
        "store": fetcher.store_name(),
        "cachedPages": cached_pages,
    })))
}

/// Lightweight ping that never touches the store.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
