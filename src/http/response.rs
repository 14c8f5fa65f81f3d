//! Mapping of handler failures to HTTP responses.
//!
//! Client errors carry a short plain-text message; a version conflict gets
//! a full HTML page so the browser user can recover. Internal errors are
//! logged and answered with a generic 500.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::http::pages;
use crate::notes::{Slug, StoreError};

#[derive(Debug)]
pub enum ApiError {
    InvalidSlug,
    NotFound,
    BadRequest(&'static str),
    TooLarge,
    Conflict(Slug),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Conflict { slug, .. } => ApiError::Conflict(slug),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidSlug => (StatusCode::BAD_REQUEST, "Invalid note slug").into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Note not found").into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::TooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Note content too large").into_response()
            }
            ApiError::Conflict(slug) => {
                (StatusCode::CONFLICT, Html(pages::conflict_page(&slug))).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let slug = Slug::parse("a").unwrap();
        let cases = [
            (ApiError::InvalidSlug, StatusCode::BAD_REQUEST),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (ApiError::BadRequest("Invalid version"), StatusCode::BAD_REQUEST),
            (ApiError::TooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (ApiError::Conflict(slug), StatusCode::CONFLICT),
            (ApiError::Internal("disk on fire".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_store_errors_map() {
        let slug = Slug::parse("a").unwrap();
        assert!(matches!(
            ApiError::from(StoreError::NotFound(slug.clone())),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(StoreError::Conflict { slug, expected: 1, current: 2 }),
            ApiError::Conflict(_)
        ));
    }
}
