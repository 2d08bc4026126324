//! # Booking Handlers
//!
//! Booking, cancellation, reschedule and appointment queries. The
//! admission decision itself lives in the database layer, which
//! serializes it per slot; these handlers validate input, invoke the
//! decision and fire the confirmation notification off the request path.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use slotwise_core::errors::BookingError;
use slotwise_core::models::appointment::{
    Appointment, AppointmentStatus, BookRawRequest, BookSlotRequest, CancelRequest,
    ListAppointmentsResponse, RescheduleRequest, SetStatusRequest,
};
use slotwise_core::models::user::User;
use slotwise_core::notify::NotificationEvent;

use crate::{middleware::error_handling::AppError, ApiState};

/// Delivers one notification in the background. The identity lookup and
/// the delivery itself are both best effort; an admitted booking stands
/// whatever happens here.
fn spawn_notification(state: Arc<ApiState>, event: NotificationEvent, appointment: Appointment) {
    tokio::spawn(async move {
        let user = match slotwise_db::repositories::user::get_user_by_id(
            &state.db_pool,
            appointment.user_id,
        )
        .await
        {
            Ok(user) => user.map(User::from),
            Err(err) => {
                warn!(
                    "Identity lookup failed for user {}: {}",
                    appointment.user_id, err
                );
                None
            }
        };

        if let Err(err) = state
            .notifier
            .notify(event, &appointment, user.as_ref())
            .await
        {
            warn!(
                "Failed to deliver {:?} notification for appointment {}: {}",
                event, appointment.id, err
            );
        }
    });
}

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = slotwise_db::repositories::appointment::book_slot(
        &state.db_pool,
        payload.user_id,
        payload.slot_id,
        payload.mode,
    )
    .await?;

    spawn_notification(
        state,
        NotificationEvent::BookingConfirmed,
        appointment.clone(),
    );

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn book_raw(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookRawRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = slotwise_db::repositories::appointment::book_raw(
        &state.db_pool,
        payload.user_id,
        payload.date,
        payload.time,
        payload.mode,
        payload.survey_id,
    )
    .await?;

    spawn_notification(
        state,
        NotificationEvent::BookingConfirmed,
        appointment.clone(),
    );

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = slotwise_db::repositories::appointment::cancel_appointment(
        &state.db_pool,
        payload.user_id,
        id,
    )
    .await?;

    spawn_notification(
        state,
        NotificationEvent::BookingCanceled,
        appointment.clone(),
    );

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn reschedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = slotwise_db::repositories::appointment::reschedule_appointment(
        &state.db_pool,
        payload.user_id,
        id,
        payload.date,
        payload.time,
    )
    .await?;

    spawn_notification(
        state,
        NotificationEvent::BookingRescheduled,
        appointment.clone(),
    );

    Ok(Json(appointment))
}

/// Query parameters for the appointment listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    pub user_id: Uuid,
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<ListAppointmentsResponse>, AppError> {
    let rows = slotwise_db::repositories::appointment::list_appointments_by_user(
        &state.db_pool,
        query.user_id,
    )
    .await
    .map_err(BookingError::Database)?;

    let appointments = rows
        .into_iter()
        .map(Appointment::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ListAppointmentsResponse { appointments }))
}

#[axum::debug_handler]
pub async fn set_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    // Administrative transitions only; bookings and cancellations go
    // through their own endpoints so the admission rules stay applied.
    if !matches!(
        payload.status,
        AppointmentStatus::Completed | AppointmentStatus::NoShow
    ) {
        return Err(AppError(BookingError::Validation(format!(
            "Status {} cannot be set directly",
            payload.status
        ))));
    }

    let appointment =
        slotwise_db::repositories::appointment::set_status(&state.db_pool, id, payload.status)
            .await?;

    Ok(Json(appointment))
}
