//! HTTP surface of the fractional CFO site: server-rendered pages, the
//! revalidation webhook, a JSON insights feed and health checks.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod site;
pub mod state;
pub mod views;

use axum::Router;

use crate::state::AppState;

/// The full application: routes plus the tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    routes::build_router(state)
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer())
}
