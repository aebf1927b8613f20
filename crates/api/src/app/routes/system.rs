use axum::http::StatusCode;

/// Liveness probe; does not touch storage.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
