pub mod appointment;
pub mod rules;
pub mod slot;
pub mod user;

use slotwise_core::errors::BookingError;

/// Wraps a driver fault as the retryable infrastructure category.
pub(crate) fn db_err(err: sqlx::Error) -> BookingError {
    BookingError::Database(eyre::Report::new(err))
}
