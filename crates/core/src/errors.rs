use thiserror::Error;

/// Error taxonomy for booking operations.
///
/// Every rejection carries a distinct variant so callers can tell
/// "slot full" apart from "slot blocked" apart from "mode not permitted".
/// `Database` is the only retryable category; it covers pool timeouts and
/// connection faults and is never used for business-rule rejections.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Blocked: {0}")]
    Blocked(String),

    #[error("Mode not allowed: {0}")]
    ModeNotAllowed(String),

    #[error("Capacity conflict: {0}")]
    CapacityConflict(String),

    #[error("Duplicate booking: {0}")]
    DuplicateBooking(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

pub type BookingResult<T> = Result<T, BookingError>;
