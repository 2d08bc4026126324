use crate::models::{DbDayRule, DbSlotRule};
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Insert-or-replace by date. Replacing overwrites every field, so an
/// upsert that omits a flag resets it rather than merging.
pub async fn upsert_day_rule(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    blocked: bool,
    online_only: bool,
    default_capacity: Option<i32>,
) -> Result<DbDayRule> {
    tracing::debug!(
        "Upserting day rule: date={}, blocked={}, online_only={}",
        date,
        blocked,
        online_only
    );

    let rule = sqlx::query_as::<_, DbDayRule>(
        r#"
        INSERT INTO day_rules (date, blocked, online_only, default_capacity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (date) DO UPDATE
        SET blocked = EXCLUDED.blocked,
            online_only = EXCLUDED.online_only,
            default_capacity = EXCLUDED.default_capacity,
            updated_at = NOW()
        RETURNING date, blocked, online_only, default_capacity, created_at, updated_at
        "#,
    )
    .bind(date)
    .bind(blocked)
    .bind(online_only)
    .bind(default_capacity)
    .fetch_one(pool)
    .await?;

    Ok(rule)
}

pub async fn get_day_rule(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Option<DbDayRule>> {
    let rule = sqlx::query_as::<_, DbDayRule>(
        r#"
        SELECT date, blocked, online_only, default_capacity, created_at, updated_at
        FROM day_rules
        WHERE date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(rule)
}

pub async fn list_day_rules_in_range(
    pool: &Pool<Postgres>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbDayRule>> {
    let rules = sqlx::query_as::<_, DbDayRule>(
        r#"
        SELECT date, blocked, online_only, default_capacity, created_at, updated_at
        FROM day_rules
        WHERE date >= $1 AND date <= $2
        ORDER BY date ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

/// Insert-or-replace by slot id.
pub async fn upsert_slot_rule(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    blocked: bool,
    online_only: bool,
    capacity: Option<i32>,
    allow_online: Option<bool>,
    allow_in_person: Option<bool>,
) -> Result<DbSlotRule> {
    tracing::debug!(
        "Upserting slot rule: slot_id={}, blocked={}, online_only={}",
        slot_id,
        blocked,
        online_only
    );

    let rule = sqlx::query_as::<_, DbSlotRule>(
        r#"
        INSERT INTO slot_rules (slot_id, blocked, online_only, capacity, allow_online, allow_in_person)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (slot_id) DO UPDATE
        SET blocked = EXCLUDED.blocked,
            online_only = EXCLUDED.online_only,
            capacity = EXCLUDED.capacity,
            allow_online = EXCLUDED.allow_online,
            allow_in_person = EXCLUDED.allow_in_person,
            updated_at = NOW()
        RETURNING slot_id, blocked, online_only, capacity, allow_online, allow_in_person,
                  created_at, updated_at
        "#,
    )
    .bind(slot_id)
    .bind(blocked)
    .bind(online_only)
    .bind(capacity)
    .bind(allow_online)
    .bind(allow_in_person)
    .fetch_one(pool)
    .await?;

    Ok(rule)
}

pub async fn get_slot_rule(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<Option<DbSlotRule>> {
    let rule = sqlx::query_as::<_, DbSlotRule>(
        r#"
        SELECT slot_id, blocked, online_only, capacity, allow_online, allow_in_person,
               created_at, updated_at
        FROM slot_rules
        WHERE slot_id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(pool)
    .await?;

    Ok(rule)
}

pub async fn list_slot_rules_for_slots(
    pool: &Pool<Postgres>,
    slot_ids: &[Uuid],
) -> Result<Vec<DbSlotRule>> {
    let rules = sqlx::query_as::<_, DbSlotRule>(
        r#"
        SELECT slot_id, blocked, online_only, capacity, allow_online, allow_in_person,
               created_at, updated_at
        FROM slot_rules
        WHERE slot_id = ANY($1)
        "#,
    )
    .bind(slot_ids)
    .fetch_all(pool)
    .await?;

    Ok(rules)
}
