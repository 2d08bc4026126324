use slotwise_core::errors::{BookingError, BookingResult};

#[test]
fn test_booking_error_display() {
    let validation = BookingError::Validation("Invalid capacity".to_string());
    let blocked = BookingError::Blocked("Date 2024-01-15 is blocked".to_string());
    let mode = BookingError::ModeNotAllowed("in_person not permitted".to_string());
    let capacity = BookingError::CapacityConflict("Slot is fully booked".to_string());
    let duplicate = BookingError::DuplicateBooking("Already booked".to_string());
    let not_found = BookingError::NotFound("Slot not found".to_string());
    let precondition = BookingError::Precondition("Appointment is canceled".to_string());
    let database = BookingError::Database(eyre::eyre!("Connection refused"));

    assert_eq!(validation.to_string(), "Validation error: Invalid capacity");
    assert_eq!(blocked.to_string(), "Blocked: Date 2024-01-15 is blocked");
    assert_eq!(mode.to_string(), "Mode not allowed: in_person not permitted");
    assert_eq!(
        capacity.to_string(),
        "Capacity conflict: Slot is fully booked"
    );
    assert_eq!(duplicate.to_string(), "Duplicate booking: Already booked");
    assert_eq!(not_found.to_string(), "Resource not found: Slot not found");
    assert_eq!(
        precondition.to_string(),
        "Precondition failed: Appointment is canceled"
    );
    assert!(database.to_string().contains("Database error:"));
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("Pool timed out");
    let error: BookingError = report.into();

    assert!(matches!(error, BookingError::Database(_)));
}

#[test]
fn test_business_rejections_are_distinct_from_infrastructure() {
    // Callers retry on Database, never on a business rejection; the two
    // must stay distinguishable by variant.
    let conflict = BookingError::CapacityConflict("full".to_string());
    let infra = BookingError::Database(eyre::eyre!("timeout"));

    assert!(!matches!(conflict, BookingError::Database(_)));
    assert!(matches!(infra, BookingError::Database(_)));
}
