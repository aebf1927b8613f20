use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use todoapi_core::{DomainError, EntityId};
use todoapi_infra::RepositoryError;

/// Everything a handler can fail with.
///
/// Caller mistakes map to 4xx; anything the server cannot resolve on its own
/// maps to 500 and is logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("todo item not found")]
    NotFound,

    #[error("path id {path} does not match body id {body}")]
    IdentityMismatch { path: EntityId, body: EntityId },

    #[error("{0}")]
    InvalidId(String),

    #[error("record {id} was modified concurrently")]
    Conflict { id: EntityId },

    #[error("{0}")]
    Storage(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RecordMissing { .. } => ApiError::NotFound,
            RepositoryError::Conflict { id } => ApiError::Conflict { id },
            RepositoryError::Backend(msg) => ApiError::Storage(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(msg) => ApiError::InvalidId(msg),
            DomainError::IdentityMismatch { expected, actual } => ApiError::IdentityMismatch {
                path: expected,
                body: actual,
            },
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::IdentityMismatch { .. } | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "not_found",
            ApiError::IdentityMismatch { .. } => "id_mismatch",
            ApiError::InvalidId(_) => "invalid_id",
            ApiError::Conflict { .. } => "concurrency_conflict",
            ApiError::Storage(_) => "storage_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        }
        json_error(status, self.code(), self.to_string())
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_outcomes_map_to_statuses() {
        let missing: ApiError = RepositoryError::RecordMissing { id: EntityId::new(1) }.into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let conflict: ApiError = RepositoryError::Conflict { id: EntityId::new(1) }.into();
        assert_eq!(conflict.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(conflict.code(), "concurrency_conflict");

        let backend: ApiError = RepositoryError::Backend("down".to_string()).into();
        assert_eq!(backend.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(backend.code(), "storage_error");
    }

    #[test]
    fn domain_errors_are_bad_requests() {
        let mismatch: ApiError =
            DomainError::identity_mismatch(EntityId::new(1), EntityId::new(2)).into();
        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(
            mismatch,
            ApiError::IdentityMismatch { path, body } if path == EntityId::new(1) && body == EntityId::new(2)
        ));

        let invalid: ApiError = DomainError::invalid_id("nope").into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "invalid_id");
    }
}
