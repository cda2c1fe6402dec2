use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Pages and the insights feed are public; the webhook is authorized by its
/// secret, not by origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
