pub mod health;
pub mod insights;
pub mod pages;
pub mod revalidate;

use axum::{extract::State, http::Uri, response::IntoResponse, response::Response, Router};

use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{render_not_found_response, LayoutChrome};

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(pages::routes())
        .merge(insights::routes())
        .merge(revalidate::routes())
        .fallback(not_found)
        .with_state(state)
}

/// JSON for unknown API paths, the 404 page for everything else.
async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    if path.starts_with("/api/") {
        return ApiError::NotFound(format!("no route for {path}")).into_response();
    }
    render_not_found_response(LayoutChrome::new(state.config(), path))
}
