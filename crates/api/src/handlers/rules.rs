//! # Rule Handlers
//!
//! Administrative upserts for the two override layers. Neither touches
//! occupancy; a rule change is picked up by the next listing or
//! admission that resolves against it.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use slotwise_core::errors::BookingError;
use slotwise_core::models::rules::{
    DayRule, SlotRule, UpsertDayRuleRequest, UpsertSlotRuleRequest,
};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn upsert_day_rule(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<NaiveDate>,
    Json(payload): Json<UpsertDayRuleRequest>,
) -> Result<Json<DayRule>, AppError> {
    if let Some(capacity) = payload.default_capacity {
        if capacity <= 0 {
            return Err(AppError(BookingError::Validation(format!(
                "Default capacity must be positive, got {capacity}"
            ))));
        }
    }

    let rule = slotwise_db::repositories::rules::upsert_day_rule(
        &state.db_pool,
        date,
        payload.blocked,
        payload.online_only,
        payload.default_capacity,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(DayRule::from(rule)))
}

#[axum::debug_handler]
pub async fn upsert_slot_rule(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
    Json(payload): Json<UpsertSlotRuleRequest>,
) -> Result<Json<SlotRule>, AppError> {
    if let Some(capacity) = payload.capacity {
        if capacity <= 0 {
            return Err(AppError(BookingError::Validation(format!(
                "Capacity must be positive, got {capacity}"
            ))));
        }
    }

    // The rule table references slots; probe first so an unknown slot is
    // a NotFound instead of a constraint violation.
    slotwise_db::repositories::slot::get_slot_by_id(&state.db_pool, slot_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Slot {slot_id} not found")))?;

    let rule = slotwise_db::repositories::rules::upsert_slot_rule(
        &state.db_pool,
        slot_id,
        payload.blocked,
        payload.online_only,
        payload.capacity,
        payload.allow_online,
        payload.allow_in_person,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(SlotRule::from(rule)))
}
