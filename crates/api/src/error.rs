use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// JSON API error, rendered as `{"error": {"type", "message", "statusCode"}}`.
/// HTML pages render error templates instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    "The content store is unavailable".to_string(),
                )
            }
            ApiError::Template(err) => {
                tracing::error!("Template rendering failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_maps_to_503() {
        let response = ApiError::Unavailable("store down".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::NotFound("no route".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
