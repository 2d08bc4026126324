//! Orchestration tests for the booking flows, run against repository
//! mocks in place of a live database.

mod test_utils;

use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use mockall::predicate;
use uuid::Uuid;

use slotwise_api::middleware::error_handling::AppError;
use slotwise_core::errors::BookingError;
use slotwise_core::models::appointment::{Appointment, AppointmentMode, AppointmentStatus};

use test_utils::TestContext;

fn sample_appointment(user_id: Uuid, slot_id: Option<Uuid>) -> Appointment {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    let start_at = date.and_time(time).and_utc();
    Appointment {
        id: Uuid::new_v4(),
        user_id,
        mode: AppointmentMode::Online,
        date,
        time,
        start_at,
        end_at: start_at + chrono::Duration::minutes(30),
        status: AppointmentStatus::Upcoming,
        slot_id,
        survey_id: None,
        created_at: Utc::now(),
    }
}

// Wrapper mirroring the booking handler's decision flow against mocks
async fn test_book_slot_wrapper(
    ctx: &TestContext,
    user_id: Uuid,
    slot_id: Uuid,
    mode: AppointmentMode,
) -> Result<Json<Appointment>, AppError> {
    let appointment = ctx
        .appointment_repo
        .book_slot(user_id, slot_id, mode)
        .await?;
    Ok(Json(appointment))
}

async fn test_cancel_wrapper(
    ctx: &TestContext,
    user_id: Uuid,
    appointment_id: Uuid,
) -> Result<Json<Appointment>, AppError> {
    let appointment = ctx
        .appointment_repo
        .cancel_appointment(user_id, appointment_id)
        .await?;
    Ok(Json(appointment))
}

#[tokio::test]
async fn test_book_slot_success() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    ctx.appointment_repo
        .expect_book_slot()
        .with(
            predicate::eq(user_id),
            predicate::eq(slot_id),
            predicate::eq(AppointmentMode::Online),
        )
        .returning(move |user_id, slot_id, _| Ok(sample_appointment(user_id, Some(slot_id))));

    let result = test_book_slot_wrapper(&ctx, user_id, slot_id, AppointmentMode::Online).await;

    let Json(appointment) = result.expect("Booking should succeed");
    assert_eq!(appointment.user_id, user_id);
    assert_eq!(appointment.slot_id, Some(slot_id));
    assert_eq!(appointment.status, AppointmentStatus::Upcoming);
}

#[tokio::test]
async fn test_book_slot_capacity_conflict_passes_through() {
    let mut ctx = TestContext::new();

    ctx.appointment_repo
        .expect_book_slot()
        .returning(|_, slot_id, _| {
            Err(BookingError::CapacityConflict(format!(
                "Slot {slot_id} is fully booked"
            )))
        });

    let result = test_book_slot_wrapper(
        &ctx,
        Uuid::new_v4(),
        Uuid::new_v4(),
        AppointmentMode::Online,
    )
    .await;

    let err = result.err().expect("Booking should be rejected");
    assert!(matches!(err.0, BookingError::CapacityConflict(_)));
}

#[tokio::test]
async fn test_book_slot_mode_rejection_is_distinct_from_capacity() {
    let mut ctx = TestContext::new();

    ctx.appointment_repo
        .expect_book_slot()
        .returning(|_, slot_id, mode| {
            Err(BookingError::ModeNotAllowed(format!(
                "Mode {mode} is not permitted for slot {slot_id}"
            )))
        });

    let result = test_book_slot_wrapper(
        &ctx,
        Uuid::new_v4(),
        Uuid::new_v4(),
        AppointmentMode::InPerson,
    )
    .await;

    let err = result.err().expect("Booking should be rejected");
    assert!(matches!(err.0, BookingError::ModeNotAllowed(_)));
}

#[tokio::test]
async fn test_cancel_not_found_vs_precondition() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let missing_id = Uuid::new_v4();
    let canceled_id = Uuid::new_v4();

    ctx.appointment_repo
        .expect_cancel_appointment()
        .with(predicate::eq(user_id), predicate::eq(missing_id))
        .returning(|_, id| Err(BookingError::NotFound(format!("Appointment {id} not found"))));
    ctx.appointment_repo
        .expect_cancel_appointment()
        .with(predicate::eq(user_id), predicate::eq(canceled_id))
        .returning(|_, id| {
            Err(BookingError::Precondition(format!(
                "Appointment {id} is canceled and cannot be canceled"
            )))
        });

    let missing = test_cancel_wrapper(&ctx, user_id, missing_id).await;
    assert!(matches!(
        missing.err().map(|e| e.0),
        Some(BookingError::NotFound(_))
    ));

    let done = test_cancel_wrapper(&ctx, user_id, canceled_id).await;
    assert!(matches!(
        done.err().map(|e| e.0),
        Some(BookingError::Precondition(_))
    ));
}

#[tokio::test]
async fn test_reschedule_conflict_passes_through() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();
    let new_date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let new_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.appointment_repo
        .expect_reschedule_appointment()
        .with(
            predicate::eq(user_id),
            predicate::eq(appointment_id),
            predicate::eq(new_date),
            predicate::eq(new_time),
        )
        .returning(|_, _, _, _| {
            Err(BookingError::CapacityConflict(
                "Target slot is fully booked".to_string(),
            ))
        });

    let result = ctx
        .appointment_repo
        .reschedule_appointment(user_id, appointment_id, new_date, new_time)
        .await;

    assert!(matches!(result, Err(BookingError::CapacityConflict(_))));
}

#[tokio::test]
async fn test_raw_booking_duplicate_passes_through() {
    let mut ctx = TestContext::new();
    let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    ctx.appointment_repo
        .expect_book_raw()
        .returning(|_, date, time, _, _| {
            Err(BookingError::DuplicateBooking(format!(
                "An upcoming appointment already exists at {date} {time}"
            )))
        });

    let result = ctx
        .appointment_repo
        .book_raw(Uuid::new_v4(), date, time, AppointmentMode::Online, None)
        .await;

    assert!(matches!(result, Err(BookingError::DuplicateBooking(_))));
}

#[tokio::test]
async fn test_build_state_provides_notifier() {
    let ctx = TestContext::new();
    let state = ctx.build_state();

    // The notifier must accept a delivery without erroring; failures at
    // delivery time are logged, never propagated to the caller.
    let appointment = sample_appointment(Uuid::new_v4(), None);
    let result = state
        .notifier
        .notify(
            slotwise_core::notify::NotificationEvent::BookingConfirmed,
            &appointment,
            None,
        )
        .await;

    assert!(result.is_ok());
}
