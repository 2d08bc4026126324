//! # Slot Handlers
//!
//! Availability listing, batch generation and administrative flag
//! toggles.
//!
//! ## Listing
//!
//! The listing handler is read-only and takes no locks: it gathers the
//! raw slots for the range, both rule layers and the current occupancy
//! counts, then resolves every slot through the same merge function the
//! admission path uses. The counts may be stale by the time the client
//! books; admission re-checks under its lock.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use slotwise_core::errors::BookingError;
use slotwise_core::generation::{self, DEFAULT_SLOT_CAPACITY};
use slotwise_core::models::rules::{DayRule, SlotRule};
use slotwise_core::models::slot::{
    AvailableSlot, GenerateSlotsRequest, GenerateSlotsResponse, ListSlotsResponse, Slot,
    UpdateSlotRequest,
};
use slotwise_core::resolver;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the availability listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListSlotsQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Resolves every slot against its rule layers and occupancy.
///
/// Pure assembly over already-fetched data; shared with tests so the
/// listing semantics stay checkable without a database.
pub fn assemble_available_slots(
    slots: Vec<Slot>,
    day_rules: &HashMap<NaiveDate, DayRule>,
    slot_rules: &HashMap<Uuid, SlotRule>,
    booked_counts: &HashMap<Uuid, i64>,
) -> Vec<AvailableSlot> {
    slots
        .into_iter()
        .map(|slot| {
            let day_rule = day_rules.get(&slot.start_at.date_naive());
            let slot_rule = slot_rules.get(&slot.id);
            let config = resolver::resolve(&slot, day_rule, slot_rule);
            let booked_count = booked_counts.get(&slot.id).copied().unwrap_or(0);

            AvailableSlot {
                slot_id: slot.id,
                start_at: slot.start_at,
                end_at: slot.end_at,
                effective_capacity: config.capacity,
                booked_count,
                effective_allow_online: config.allow_online,
                effective_allow_in_person: config.allow_in_person,
                is_available: config.is_available(booked_count),
            }
        })
        .collect()
}

#[axum::debug_handler]
pub async fn list_available_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<ListSlotsResponse>, AppError> {
    if query.from > query.to {
        return Err(AppError(BookingError::Validation(format!(
            "Invalid date range: {} is after {}",
            query.from, query.to
        ))));
    }

    let range_start = query.from.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    let range_end = query
        .to
        .checked_add_days(Days::new(1))
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());
    let (Some(range_start), Some(range_end)) = (range_start, range_end) else {
        return Err(AppError(BookingError::Validation(
            "Date range is out of bounds".to_string(),
        )));
    };

    // Fetch raw slots, then batch the rule layers and occupancy counts
    // for the range to avoid per-slot queries.
    let db_slots = slotwise_db::repositories::slot::list_slots_in_range(
        &state.db_pool,
        range_start,
        range_end,
        true,
    )
    .await
    .map_err(BookingError::Database)?;

    let slot_ids: Vec<Uuid> = db_slots.iter().map(|slot| slot.id).collect();

    let day_rules: HashMap<NaiveDate, DayRule> =
        slotwise_db::repositories::rules::list_day_rules_in_range(
            &state.db_pool,
            query.from,
            query.to,
        )
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(|rule| (rule.date, DayRule::from(rule)))
        .collect();

    let slot_rules: HashMap<Uuid, SlotRule> =
        slotwise_db::repositories::rules::list_slot_rules_for_slots(&state.db_pool, &slot_ids)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|rule| (rule.slot_id, SlotRule::from(rule)))
            .collect();

    let booked_counts: HashMap<Uuid, i64> =
        slotwise_db::repositories::appointment::occupancy_counts_for_slots(
            &state.db_pool,
            &slot_ids,
        )
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .collect();

    let slots = assemble_available_slots(
        db_slots.into_iter().map(Slot::from).collect(),
        &day_rules,
        &slot_rules,
        &booked_counts,
    );

    Ok(Json(ListSlotsResponse { slots }))
}

#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<GenerateSlotsRequest>,
) -> Result<Json<GenerateSlotsResponse>, AppError> {
    let duration_minutes = payload
        .duration_minutes
        .unwrap_or(generation::DEFAULT_DURATION_MINUTES);

    let windows = generation::layout_windows(payload.from, payload.to, duration_minutes)?;

    let (created, skipped) = slotwise_db::repositories::slot::generate_slots(
        &state.db_pool,
        &windows,
        DEFAULT_SLOT_CAPACITY,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(GenerateSlotsResponse { created, skipped }))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<Slot>, AppError> {
    if let Some(capacity) = payload.capacity {
        if capacity <= 0 {
            return Err(AppError(BookingError::Validation(format!(
                "Capacity must be positive, got {capacity}"
            ))));
        }
    }

    let slot = slotwise_db::repositories::slot::update_slot(
        &state.db_pool,
        id,
        payload.active,
        payload.capacity,
        payload.allow_online,
        payload.allow_in_person,
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| BookingError::NotFound(format!("Slot {id} not found")))?;

    Ok(Json(Slot::from(slot)))
}
