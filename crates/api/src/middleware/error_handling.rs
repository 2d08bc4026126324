//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the
//! slotwise API. It maps domain-specific errors to appropriate HTTP
//! status codes and JSON error responses, so callers can distinguish
//! "slot full" from "slot blocked" from "mode not permitted" by status
//! and error kind alone.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotwise_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookingError` instances and
/// implements `IntoResponse` to convert them into HTTP responses with
/// appropriate status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// Converts application errors to HTTP responses
///
/// Business rejections map to 4xx codes per kind; only infrastructure
/// faults surface as 500 and are the retryable category.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let (status, kind) = match &self.0 {
            BookingError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            BookingError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            BookingError::Blocked(_) => (StatusCode::CONFLICT, "blocked"),
            BookingError::CapacityConflict(_) => (StatusCode::CONFLICT, "capacity_conflict"),
            BookingError::DuplicateBooking(_) => (StatusCode::CONFLICT, "duplicate_booking"),
            BookingError::Precondition(_) => (StatusCode::CONFLICT, "precondition"),
            BookingError::ModeNotAllowed(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "mode_not_allowed")
            }
            BookingError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database"),
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message, "kind": kind }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
///
/// This implementation allows using `?` operator with functions that
/// return `Result<T, BookingError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Wraps the report in the infrastructure category; plain repository
/// faults are never business rejections.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
