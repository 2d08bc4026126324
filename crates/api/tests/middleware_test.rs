use slotwise_api::middleware::error_handling::map_error;
use slotwise_core::errors::BookingError;

#[tokio::test]
async fn test_error_handling_validation() {
    let error = BookingError::Validation("Invalid input".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_not_found() {
    let error = BookingError::NotFound("Slot not found".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_blocked() {
    let error = BookingError::Blocked("Date is blocked".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_capacity_conflict() {
    let error = BookingError::CapacityConflict("Slot is fully booked".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_duplicate_booking() {
    let error = BookingError::DuplicateBooking("Already booked".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_precondition() {
    let error = BookingError::Precondition("Appointment is canceled".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_mode_not_allowed() {
    let error = BookingError::ModeNotAllowed("in_person not permitted".to_string());

    let response = map_error(error);

    assert_eq!(
        response.status(),
        axum::http::StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_error_handling_database() {
    let error = BookingError::Database(eyre::eyre!("Connection refused"));

    let response = map_error(error);

    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}
