use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use fractional_site_core::revalidate::{revalidate, slug_from_body};
use serde::Deserialize;
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

/// Webhook bodies are a handful of fields.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/revalidate",
        post(revalidate_handler).layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
    )
}

#[derive(Debug, Deserialize)]
struct RevalidateParams {
    secret: Option<String>,
}

/// CMS publish webhook. Drops the cached listing and, when the body names a
/// slug, the cached detail page. The response is sent only after the cache
/// entries are gone.
async fn revalidate_handler(
    State(state): State<AppState>,
    params: Result<Query<RevalidateParams>, QueryRejection>,
    body: Bytes,
) -> Response {
    let secret = match &params {
        Ok(Query(params)) => params.secret.as_deref(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable revalidation query");
            None
        }
    };
    if !state.secret().verify(secret) {
        tracing::warn!("rejected revalidation request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "message": "Invalid secret" })),
        )
            .into_response();
    }

    let slug = slug_from_body(&body);
    let outcome = revalidate(state.cache(), slug).await;
    Json(outcome).into_response()
}
