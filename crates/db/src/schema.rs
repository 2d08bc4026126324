use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            start_at TIMESTAMP WITH TIME ZONE NOT NULL,
            end_at TIMESTAMP WITH TIME ZONE NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            capacity INTEGER NOT NULL,
            allow_online BOOLEAN NOT NULL DEFAULT TRUE,
            allow_in_person BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_slot_range CHECK (end_at > start_at),
            CONSTRAINT positive_capacity CHECK (capacity > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create day_rules table, one row per calendar date
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS day_rules (
            date DATE PRIMARY KEY,
            blocked BOOLEAN NOT NULL DEFAULT FALSE,
            online_only BOOLEAN NOT NULL DEFAULT FALSE,
            default_capacity INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_default_capacity
                CHECK (default_capacity IS NULL OR default_capacity > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slot_rules table, one row per slot
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slot_rules (
            slot_id UUID PRIMARY KEY REFERENCES slots(id),
            blocked BOOLEAN NOT NULL DEFAULT FALSE,
            online_only BOOLEAN NOT NULL DEFAULT FALSE,
            capacity INTEGER NULL,
            allow_online BOOLEAN NULL,
            allow_in_person BOOLEAN NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_rule_capacity
                CHECK (capacity IS NULL OR capacity > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. user_id is an opaque reference into the
    // identity collaborator, so it carries no foreign key.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            mode VARCHAR(16) NOT NULL,
            date DATE NOT NULL,
            time TIME NOT NULL,
            start_at TIMESTAMP WITH TIME ZONE NOT NULL,
            end_at TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'upcoming',
            slot_id UUID NULL REFERENCES slots(id),
            survey_id UUID NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_appointment_range CHECK (end_at > start_at)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes. The partial unique index backs the legacy raw
    // booking path: of two concurrent inserts for the same date/time, the
    // loser hits the constraint instead of silently double-booking.
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_slots_start_at ON slots(start_at)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_slot_status ON appointments(slot_id, status)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_user_id ON appointments(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_date_time ON appointments(date, time)",
        "CREATE UNIQUE INDEX IF NOT EXISTS uniq_appointments_raw_upcoming \
         ON appointments(date, time) \
         WHERE status = 'upcoming' AND slot_id IS NULL",
    ];
    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
