use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use slotwise_core::errors::BookingError;
use slotwise_core::models::appointment::Appointment;
use slotwise_core::models::rules::{DayRule, SlotRule};
use slotwise_core::models::slot::Slot;
use slotwise_core::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub active: bool,
    pub capacity: i32,
    pub allow_online: bool,
    pub allow_in_person: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Slot {
            id: row.id,
            start_at: row.start_at,
            end_at: row.end_at,
            active: row.active,
            capacity: row.capacity,
            allow_online: row.allow_online,
            allow_in_person: row.allow_in_person,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDayRule {
    pub date: NaiveDate,
    pub blocked: bool,
    pub online_only: bool,
    pub default_capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbDayRule> for DayRule {
    fn from(row: DbDayRule) -> Self {
        DayRule {
            date: row.date,
            blocked: row.blocked,
            online_only: row.online_only,
            default_capacity: row.default_capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlotRule {
    pub slot_id: Uuid,
    pub blocked: bool,
    pub online_only: bool,
    pub capacity: Option<i32>,
    pub allow_online: Option<bool>,
    pub allow_in_person: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbSlotRule> for SlotRule {
    fn from(row: DbSlotRule) -> Self {
        SlotRule {
            slot_id: row.slot_id,
            blocked: row.blocked,
            online_only: row.online_only,
            capacity: row.capacity,
            allow_online: row.allow_online,
            allow_in_person: row.allow_in_person,
        }
    }
}

/// Ledger row. `mode` and `status` are stored as text and parsed into the
/// domain enums on the way out; an unparseable value means the row was
/// written outside this service and is reported as a database fault.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mode: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
    pub slot_id: Option<Uuid>,
    pub survey_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = BookingError;

    fn try_from(row: DbAppointment) -> Result<Self, Self::Error> {
        let mode = row
            .mode
            .parse()
            .map_err(|_| BookingError::Database(eyre::eyre!("Unknown mode in ledger: {}", row.mode)))?;
        let status = row.status.parse().map_err(|_| {
            BookingError::Database(eyre::eyre!("Unknown status in ledger: {}", row.status))
        })?;

        Ok(Appointment {
            id: row.id,
            user_id: row.user_id,
            mode,
            date: row.date,
            time: row.time,
            start_at: row.start_at,
            end_at: row.end_at,
            status,
            slot_id: row.slot_id,
            survey_id: row.survey_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
        }
    }
}
