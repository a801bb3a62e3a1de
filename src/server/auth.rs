//! Bearer-token authentication for the generation endpoints.

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::startup::AppState;

/// Accepts both `Authorization: Bearer <token>` and a bare token.
pub fn normalize_token(header_value: &str) -> &str {
    header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim()
}

pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(normalize_token);

    match provided {
        Some(token) if token == state.config.api_token => next.run(request).await,
        Some(_) => {
            tracing::warn!("rejected request with invalid API token");
            unauthorized("Invalid API token")
        }
        None => unauthorized("Missing Authorization header"),
    }
}

fn unauthorized(detail: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response()
}
