//! Ledger queries and the serialized admission paths.
//!
//! Occupancy is always computed by counting upcoming rows, so a
//! cancellation is visible to the next admission check without any
//! counter bookkeeping. Admission itself (recount + insert) runs inside a
//! transaction holding a row-level lock on the slot record; two
//! concurrent requests for the same slot serialize at the database, and
//! the loser sees the winner's row in its recount. Handlers may run in
//! any number of processes, so no in-memory locking is involved anywhere.

use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use slotwise_core::errors::{BookingError, BookingResult};
use slotwise_core::generation::{appointment_window, DEFAULT_DURATION_MINUTES};
use slotwise_core::models::appointment::{Appointment, AppointmentMode, AppointmentStatus};
use slotwise_core::models::rules::{DayRule, SlotRule};
use slotwise_core::models::slot::Slot;
use slotwise_core::resolver;

use crate::models::{DbAppointment, DbDayRule, DbSlot, DbSlotRule};
use crate::repositories::db_err;

/// Number of upcoming ledger entries for one slot.
pub async fn occupancy_count(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE slot_id = $1 AND status = 'upcoming'
        "#,
    )
    .bind(slot_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Upcoming occupancy for a batch of slots; slots with no bookings are
/// absent from the result.
pub async fn occupancy_counts_for_slots(
    pool: &Pool<Postgres>,
    slot_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>> {
    let counts: Vec<(Uuid, i64)> = sqlx::query_as(
        r#"
        SELECT slot_id, COUNT(*)
        FROM appointments
        WHERE slot_id = ANY($1) AND status = 'upcoming'
        GROUP BY slot_id
        "#,
    )
    .bind(slot_ids)
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

/// Legacy raw-path probe: any upcoming entry at this exact date/time,
/// regardless of slot linkage.
pub async fn find_conflicting(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, user_id, mode, date, time, start_at, end_at, status,
               slot_id, survey_id, created_at, updated_at
        FROM appointments
        WHERE date = $1 AND time = $2 AND status = 'upcoming'
        LIMIT 1
        "#,
    )
    .bind(date)
    .bind(time)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, user_id, mode, date, time, start_at, end_at, status,
               slot_id, survey_id, created_at, updated_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn list_appointments_by_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, user_id, mode, date, time, start_at, end_at, status,
               slot_id, survey_id, created_at, updated_at
        FROM appointments
        WHERE user_id = $1
        ORDER BY start_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Administrative status transition (completed / no-show). Occupancy
/// derives from status, so no further bookkeeping is needed here.
pub async fn set_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: AppointmentStatus,
) -> BookingResult<Appointment> {
    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, mode, date, time, start_at, end_at, status,
                  slot_id, survey_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
    .map_err(db_err)?
    .ok_or_else(|| BookingError::NotFound(format!("Appointment {id} not found")))?;

    row.try_into()
}

async fn day_rule_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    date: NaiveDate,
) -> BookingResult<Option<DayRule>> {
    let rule = sqlx::query_as::<_, DbDayRule>(
        r#"
        SELECT date, blocked, online_only, default_capacity, created_at, updated_at
        FROM day_rules
        WHERE date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(rule.map(DayRule::from))
}

async fn slot_rule_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: Uuid,
) -> BookingResult<Option<SlotRule>> {
    let rule = sqlx::query_as::<_, DbSlotRule>(
        r#"
        SELECT slot_id, blocked, online_only, capacity, allow_online, allow_in_person,
               created_at, updated_at
        FROM slot_rules
        WHERE slot_id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(rule.map(SlotRule::from))
}

/// Upcoming occupancy inside the admission transaction. `exclude`
/// removes the appointment being rescheduled from its own count.
async fn occupancy_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: Uuid,
    exclude: Option<Uuid>,
) -> BookingResult<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE slot_id = $1 AND status = 'upcoming' AND ($2::uuid IS NULL OR id != $2)
        "#,
    )
    .bind(slot_id)
    .bind(exclude)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(count)
}

/// Locks the slot row, serializing every admission against this slot for
/// the rest of the transaction.
async fn lock_slot_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    slot_id: Uuid,
) -> BookingResult<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_at, end_at, active, capacity, allow_online, allow_in_person, created_at
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(slot)
}

/// Admission checks shared by booking and reschedule, run with the slot
/// row already locked: resolve the effective configuration, enforce
/// blocked/mode rules, recount occupancy against effective capacity.
async fn admit_into_slot(
    tx: &mut Transaction<'_, Postgres>,
    slot: &DbSlot,
    mode: AppointmentMode,
    exclude: Option<Uuid>,
) -> BookingResult<()> {
    let slot_id = slot.id;
    if !slot.active {
        return Err(BookingError::Blocked(format!("Slot {slot_id} is inactive")));
    }

    let core_slot = Slot::from(slot.clone());
    let day_rule = day_rule_in_tx(tx, slot.start_at.date_naive()).await?;
    let slot_rule = slot_rule_in_tx(tx, slot_id).await?;
    let effective = resolver::resolve(&core_slot, day_rule.as_ref(), slot_rule.as_ref());

    if effective.blocked {
        return Err(BookingError::Blocked(format!("Slot {slot_id} is blocked")));
    }
    if !effective.permits(mode) {
        return Err(BookingError::ModeNotAllowed(format!(
            "Mode {mode} is not permitted for slot {slot_id}"
        )));
    }

    let booked = occupancy_in_tx(tx, slot_id, exclude).await?;
    if booked >= i64::from(effective.capacity) {
        return Err(BookingError::CapacityConflict(format!(
            "Slot {slot_id} is fully booked ({booked}/{})",
            effective.capacity
        )));
    }

    Ok(())
}

/// Books one appointment against a slot.
///
/// An early return before commit rolls the transaction back, releasing
/// the lock without a trace.
pub async fn book_slot(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    slot_id: Uuid,
    mode: AppointmentMode,
) -> BookingResult<Appointment> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let slot = lock_slot_in_tx(&mut tx, slot_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Slot {slot_id} not found")))?;

    admit_into_slot(&mut tx, &slot, mode, None).await?;

    let id = Uuid::new_v4();
    let date = slot.start_at.date_naive();
    let time = slot.start_at.time();
    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, user_id, mode, date, time, start_at, end_at, status, slot_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, mode, date, time, start_at, end_at, status,
                  slot_id, survey_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(mode.as_str())
    .bind(date)
    .bind(time)
    .bind(slot.start_at)
    .bind(slot.end_at)
    .bind(AppointmentStatus::Upcoming.as_str())
    .bind(slot_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::info!("Admitted appointment {} for slot {}", id, slot_id);
    row.try_into()
}

/// Legacy raw-path booking: no slot identity, fixed default duration,
/// exactly one upcoming entry per (date, time).
///
/// The partial unique index on upcoming unlinked entries backs this up
/// under concurrency: the losing insert of a race fails the constraint
/// and is reported as a duplicate instead of double-booking.
pub async fn book_raw(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    mode: AppointmentMode,
    survey_id: Option<Uuid>,
) -> BookingResult<Appointment> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    // No slot rule layer exists on this path; the day rule decides alone.
    let day_rule = day_rule_in_tx(&mut tx, date).await?;
    if let Some(rule) = &day_rule {
        if rule.blocked {
            return Err(BookingError::Blocked(format!("Date {date} is blocked")));
        }
        if rule.online_only && mode == AppointmentMode::InPerson {
            return Err(BookingError::ModeNotAllowed(format!(
                "Date {date} accepts online appointments only"
            )));
        }
    }

    let existing: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id
        FROM appointments
        WHERE date = $1 AND time = $2 AND status = 'upcoming'
        LIMIT 1
        "#,
    )
    .bind(date)
    .bind(time)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?;
    if existing.is_some() {
        return Err(BookingError::DuplicateBooking(format!(
            "An upcoming appointment already exists at {date} {time}"
        )));
    }

    let id = Uuid::new_v4();
    let (start_at, end_at) = appointment_window(date, time, DEFAULT_DURATION_MINUTES);
    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, user_id, mode, date, time, start_at, end_at, status, survey_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, mode, date, time, start_at, end_at, status,
                  slot_id, survey_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(mode.as_str())
    .bind(date)
    .bind(time)
    .bind(start_at)
    .bind(end_at)
    .bind(AppointmentStatus::Upcoming.as_str())
    .bind(survey_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db) if db.constraint() == Some("uniq_appointments_raw_upcoming") => {
            BookingError::DuplicateBooking(format!(
                "An upcoming appointment already exists at {date} {time}"
            ))
        }
        _ => db_err(err),
    })?;

    tx.commit().await.map_err(db_err)?;

    tracing::info!("Admitted raw appointment {} at {} {}", id, date, time);
    row.try_into()
}

/// Cancels an upcoming appointment owned by `user_id`.
///
/// The status predicate makes the update race-free: a concurrent
/// transition wins and this call reports the precondition failure.
/// Occupancy derives from status, so the freed seat is visible to the
/// next admission check immediately.
pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    appointment_id: Uuid,
) -> BookingResult<Appointment> {
    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = 'canceled', updated_at = NOW()
        WHERE id = $1 AND user_id = $2 AND status = 'upcoming'
        RETURNING id, user_id, mode, date, time, start_at, end_at, status,
                  slot_id, survey_id, created_at, updated_at
        "#,
    )
    .bind(appointment_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    match row {
        Some(row) => {
            tracing::info!("Canceled appointment {}", appointment_id);
            row.try_into()
        }
        None => {
            let existing = get_appointment_by_id(pool, appointment_id)
                .await
                .map_err(BookingError::Database)?;
            match existing {
                Some(appt) if appt.user_id == user_id => Err(BookingError::Precondition(format!(
                    "Appointment {appointment_id} is {} and cannot be canceled",
                    appt.status
                ))),
                _ => Err(BookingError::NotFound(format!(
                    "Appointment {appointment_id} not found"
                ))),
            }
        }
    }
}

/// Moves an upcoming appointment to a new date/time in place.
///
/// The full admission protocol runs against the target: if a slot exists
/// at the new start instant its rules and capacity apply, otherwise the
/// legacy raw-path checks do. Any rejection rolls back, leaving the
/// original row untouched. On success the same ledger row is updated;
/// no new identity is created.
pub async fn reschedule_appointment(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    appointment_id: Uuid,
    new_date: NaiveDate,
    new_time: NaiveTime,
) -> BookingResult<Appointment> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    // Lock the ledger row first so concurrent reschedules and cancels of
    // the same appointment serialize.
    let appt = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, user_id, mode, date, time, start_at, end_at, status,
               slot_id, survey_id, created_at, updated_at
        FROM appointments
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(appointment_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| BookingError::NotFound(format!("Appointment {appointment_id} not found")))?;

    if appt.user_id != user_id {
        return Err(BookingError::NotFound(format!(
            "Appointment {appointment_id} not found"
        )));
    }
    if appt.status != AppointmentStatus::Upcoming.as_str() {
        return Err(BookingError::Precondition(format!(
            "Appointment {appointment_id} is {} and cannot be rescheduled",
            appt.status
        )));
    }
    let mode: AppointmentMode = appt
        .mode
        .parse()
        .map_err(|_| BookingError::Database(eyre::eyre!("Unknown mode in ledger: {}", appt.mode)))?;

    let target_start = new_date.and_time(new_time).and_utc();
    let target_slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_at, end_at, active, capacity, allow_online, allow_in_person, created_at
        FROM slots
        WHERE start_at = $1 AND active
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(target_start)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?;

    let (start_at, end_at, slot_id) = match &target_slot {
        Some(slot) => {
            admit_into_slot(&mut tx, slot, mode, Some(appointment_id)).await?;
            (slot.start_at, slot.end_at, Some(slot.id))
        }
        None => {
            let day_rule = day_rule_in_tx(&mut tx, new_date).await?;
            if let Some(rule) = &day_rule {
                if rule.blocked {
                    return Err(BookingError::Blocked(format!("Date {new_date} is blocked")));
                }
                if rule.online_only && mode == AppointmentMode::InPerson {
                    return Err(BookingError::ModeNotAllowed(format!(
                        "Date {new_date} accepts online appointments only"
                    )));
                }
            }

            let conflict: Option<Uuid> = sqlx::query_scalar(
                r#"
                SELECT id
                FROM appointments
                WHERE date = $1 AND time = $2 AND status = 'upcoming' AND id != $3
                LIMIT 1
                "#,
            )
            .bind(new_date)
            .bind(new_time)
            .bind(appointment_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
            if conflict.is_some() {
                return Err(BookingError::DuplicateBooking(format!(
                    "An upcoming appointment already exists at {new_date} {new_time}"
                )));
            }

            let (start_at, end_at) =
                appointment_window(new_date, new_time, DEFAULT_DURATION_MINUTES);
            (start_at, end_at, None)
        }
    };

    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET date = $2, time = $3, start_at = $4, end_at = $5, slot_id = $6, updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, mode, date, time, start_at, end_at, status,
                  slot_id, survey_id, created_at, updated_at
        "#,
    )
    .bind(appointment_id)
    .bind(new_date)
    .bind(new_time)
    .bind(start_at)
    .bind(end_at)
    .bind(slot_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::info!(
        "Rescheduled appointment {} to {} {}",
        appointment_id,
        new_date,
        new_time
    );
    row.try_into()
}
