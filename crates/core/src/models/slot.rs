use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable time window with its base capacity and mode flags.
///
/// These are the pre-override attributes; day and slot rules are layered
/// on top by the resolver before any listing or admission decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub active: bool,
    pub capacity: i32,
    pub allow_online: bool,
    pub allow_in_person: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub active: Option<bool>,
    pub capacity: Option<i32>,
    pub allow_online: Option<bool>,
    pub allow_in_person: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsResponse {
    pub created: usize,
    pub skipped: usize,
}

/// One entry of the availability listing: a slot with its resolved
/// effective attributes and current occupancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub slot_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub effective_capacity: i32,
    pub booked_count: i64,
    pub effective_allow_online: bool,
    pub effective_allow_in_person: bool,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSlotsResponse {
    pub slots: Vec<AvailableSlot>,
}
