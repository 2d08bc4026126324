use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Blanket override for every slot falling on one calendar date.
///
/// `default_capacity = None` means "defer to the slot's own capacity".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRule {
    pub date: NaiveDate,
    pub blocked: bool,
    pub online_only: bool,
    pub default_capacity: Option<i32>,
}

/// Override for exactly one slot, taking precedence over the day rule.
///
/// `allow_online` / `allow_in_person` are tri-state: `None` falls through
/// to the slot's own flag, never to a hard-coded default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRule {
    pub slot_id: Uuid,
    pub blocked: bool,
    pub online_only: bool,
    pub capacity: Option<i32>,
    pub allow_online: Option<bool>,
    pub allow_in_person: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertDayRuleRequest {
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub online_only: bool,
    pub default_capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSlotRuleRequest {
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub online_only: bool,
    pub capacity: Option<i32>,
    pub allow_online: Option<bool>,
    pub allow_in_person: Option<bool>,
}
