//! Derives a slot's effective configuration from its override layers.
//!
//! Three sources are merged with fixed precedence: the slot rule wins over
//! the day rule, which wins over the slot's own defaults. The fallthrough
//! is asymmetric: `blocked`, `online_only` and `capacity` fall through
//! day rule then slot, while the two allow-mode tri-states fall through
//! only to the slot's own flags (a day rule constrains mode permission
//! solely via `online_only`).
//!
//! Both the availability listing and the admission check call [`resolve`];
//! keeping a single merge function is what prevents drift between "what
//! was advertised as available" and "what is actually admitted".

use crate::models::appointment::AppointmentMode;
use crate::models::rules::{DayRule, SlotRule};
use crate::models::slot::Slot;

/// The resolved, post-override attributes of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub blocked: bool,
    pub online_only: bool,
    pub capacity: i32,
    pub allow_online: bool,
    pub allow_in_person: bool,
}

impl EffectiveConfig {
    /// Whether a booking in `mode` is permitted.
    ///
    /// An in-person booking requires both the allow flag and the absence
    /// of an online-only restriction; the raw allow flag alone is not
    /// sufficient.
    pub fn permits(&self, mode: AppointmentMode) -> bool {
        match mode {
            AppointmentMode::Online => self.allow_online,
            AppointmentMode::InPerson => self.allow_in_person && !self.online_only,
        }
    }

    pub fn is_available(&self, booked_count: i64) -> bool {
        !self.blocked && booked_count < i64::from(self.capacity)
    }
}

/// Merges a slot with its (optional) day and slot rules.
///
/// Total and side-effect free: every combination of inputs yields a
/// configuration, and calling it twice with the same inputs yields the
/// same result.
pub fn resolve(
    slot: &Slot,
    day_rule: Option<&DayRule>,
    slot_rule: Option<&SlotRule>,
) -> EffectiveConfig {
    let blocked = slot_rule
        .map(|r| r.blocked)
        .or_else(|| day_rule.map(|r| r.blocked))
        .unwrap_or(false);

    let online_only = slot_rule
        .map(|r| r.online_only)
        .or_else(|| day_rule.map(|r| r.online_only))
        .unwrap_or(false);

    let capacity = slot_rule
        .and_then(|r| r.capacity)
        .or_else(|| day_rule.and_then(|r| r.default_capacity))
        .unwrap_or(slot.capacity);

    let allow_online = slot_rule
        .and_then(|r| r.allow_online)
        .unwrap_or(slot.allow_online);

    let allow_in_person = slot_rule
        .and_then(|r| r.allow_in_person)
        .unwrap_or(slot.allow_in_person);

    EffectiveConfig {
        blocked,
        online_only,
        capacity,
        allow_online,
        allow_in_person,
    }
}
