use crate::models::DbSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Inserts a slot as-is. Duplicate detection is the generation routine's
/// responsibility, not this function's.
pub async fn create_slot(
    pool: &Pool<Postgres>,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    capacity: i32,
    allow_online: bool,
    allow_in_person: bool,
) -> Result<DbSlot> {
    let id = Uuid::new_v4();

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (id, start_at, end_at, capacity, allow_online, allow_in_person)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, start_at, end_at, active, capacity, allow_online, allow_in_person, created_at
        "#,
    )
    .bind(id)
    .bind(start_at)
    .bind(end_at)
    .bind(capacity)
    .bind(allow_online)
    .bind(allow_in_person)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_at, end_at, active, capacity, allow_online, allow_in_person, created_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Probe used by the generation routine before inserting a window.
pub async fn find_slot_by_start(
    pool: &Pool<Postgres>,
    start_at: DateTime<Utc>,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_at, end_at, active, capacity, allow_online, allow_in_person, created_at
        FROM slots
        WHERE start_at = $1
        LIMIT 1
        "#,
    )
    .bind(start_at)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn list_slots_in_range(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    active_only: bool,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_at, end_at, active, capacity, allow_online, allow_in_person, created_at
        FROM slots
        WHERE start_at >= $1 AND start_at < $2 AND (active OR NOT $3)
        ORDER BY start_at ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Administrator flag toggles; unset fields keep their current value.
pub async fn update_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    active: Option<bool>,
    capacity: Option<i32>,
    allow_online: Option<bool>,
    allow_in_person: Option<bool>,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET active = COALESCE($2, active),
            capacity = COALESCE($3, capacity),
            allow_online = COALESCE($4, allow_online),
            allow_in_person = COALESCE($5, allow_in_person)
        WHERE id = $1
        RETURNING id, start_at, end_at, active, capacity, allow_online, allow_in_person, created_at
        "#,
    )
    .bind(id)
    .bind(active)
    .bind(capacity)
    .bind(allow_online)
    .bind(allow_in_person)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Lays the given windows out as slots, probing for an existing slot at
/// each start instant first. Re-running over the same range is a no-op
/// for windows that already exist. Returns (created, skipped).
pub async fn generate_slots(
    pool: &Pool<Postgres>,
    windows: &[(DateTime<Utc>, DateTime<Utc>)],
    capacity: i32,
) -> Result<(usize, usize)> {
    let mut created = 0;
    let mut skipped = 0;

    for (start_at, end_at) in windows {
        if find_slot_by_start(pool, *start_at).await?.is_some() {
            skipped += 1;
            continue;
        }
        create_slot(pool, *start_at, *end_at, capacity, true, true).await?;
        created += 1;
    }

    tracing::debug!("Slot generation: {} created, {} skipped", created, skipped);
    Ok((created, skipped))
}
