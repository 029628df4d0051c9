use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// JSON 404 for unmatched routes. Used as the router fallback.
pub async fn not_found(uri: Uri) -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        format!("No route for {}", uri.path()),
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}
