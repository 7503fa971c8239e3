//! # REST API
//!
//! Axum handlers per entity. Every handler logs the request line, calls
//! the matching service, and maps typed failures to HTTP statuses.

pub mod auth_apis;
pub mod board_apis;
pub mod image_apis;
pub mod square_apis;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::AppError;

/// HTTP status for each failure in the taxonomy.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::DuplicateEmail => StatusCode::CONFLICT,
        AppError::InvalidCredentials | AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AppError::NotFound(..) => StatusCode::NOT_FOUND,
        AppError::Validation(_) | AppError::UploadFailed(_) => StatusCode::BAD_REQUEST,
        AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed operation and turn it into a response.
pub(crate) fn error_response(operation: &str, err: AppError) -> Response {
    error!("{} failed: {}", operation, err);
    (status_for(&err), err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&AppError::DuplicateEmail), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&AppError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&AppError::NotAuthenticated),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&AppError::NotFound("board", "b".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&AppError::Validation("v".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::UploadFailed("u".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Persistence(anyhow::anyhow!("io"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
