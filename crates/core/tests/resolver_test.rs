use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use slotwise_core::models::appointment::AppointmentMode;
use slotwise_core::models::rules::{DayRule, SlotRule};
use slotwise_core::models::slot::Slot;
use slotwise_core::resolver::resolve;
use uuid::Uuid;

fn base_slot(capacity: i32) -> Slot {
    let start_at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    Slot {
        id: Uuid::new_v4(),
        start_at,
        end_at: start_at + chrono::Duration::minutes(30),
        active: true,
        capacity,
        allow_online: true,
        allow_in_person: true,
        created_at: Utc::now(),
    }
}

fn day_rule(blocked: bool, online_only: bool, default_capacity: Option<i32>) -> DayRule {
    DayRule {
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        blocked,
        online_only,
        default_capacity,
    }
}

fn slot_rule(slot_id: Uuid) -> SlotRule {
    SlotRule {
        slot_id,
        blocked: false,
        online_only: false,
        capacity: None,
        allow_online: None,
        allow_in_person: None,
    }
}

#[test]
fn no_rules_falls_back_to_slot_defaults() {
    let slot = base_slot(5);
    let config = resolve(&slot, None, None);

    assert!(!config.blocked);
    assert!(!config.online_only);
    assert_eq!(config.capacity, 5);
    assert!(config.allow_online);
    assert!(config.allow_in_person);
}

#[test]
fn day_rule_capacity_overrides_slot_capacity() {
    let slot = base_slot(5);
    let day = day_rule(false, false, Some(2));

    let config = resolve(&slot, Some(&day), None);

    assert_eq!(config.capacity, 2);
}

#[test]
fn slot_rule_capacity_overrides_day_rule_capacity() {
    let slot = base_slot(5);
    let day = day_rule(false, false, Some(2));
    let mut rule = slot_rule(slot.id);
    rule.capacity = Some(4);

    let config = resolve(&slot, Some(&day), Some(&rule));

    assert_eq!(config.capacity, 4);
}

#[test]
fn null_slot_rule_capacity_defers_to_day_rule() {
    // SlotRule present but with capacity unset: the day rule's default
    // still applies before the slot's own capacity.
    let slot = base_slot(5);
    let day = day_rule(false, false, Some(2));
    let rule = slot_rule(slot.id);

    let config = resolve(&slot, Some(&day), Some(&rule));

    assert_eq!(config.capacity, 2);
}

#[test]
fn null_day_rule_capacity_defers_to_slot() {
    let slot = base_slot(5);
    let day = day_rule(false, false, None);

    let config = resolve(&slot, Some(&day), None);

    assert_eq!(config.capacity, 5);
}

#[test]
fn slot_rule_unblocks_a_blocked_day() {
    // The slot rule's blocked flag wins over the day rule's, in both
    // directions: a per-slot exception can reopen a blocked day.
    let slot = base_slot(5);
    let day = day_rule(true, false, None);
    let rule = slot_rule(slot.id);

    let config = resolve(&slot, Some(&day), Some(&rule));

    assert!(!config.blocked);
}

#[test]
fn day_block_applies_when_no_slot_rule_exists() {
    let slot = base_slot(5);
    let day = day_rule(true, false, None);

    let config = resolve(&slot, Some(&day), None);

    assert!(config.blocked);
}

#[test]
fn slot_rule_blocks_an_open_day() {
    let slot = base_slot(5);
    let day = day_rule(false, false, None);
    let mut rule = slot_rule(slot.id);
    rule.blocked = true;

    let config = resolve(&slot, Some(&day), Some(&rule));

    assert!(config.blocked);
}

#[test]
fn online_only_day_keeps_raw_allow_flag_but_rejects_in_person() {
    // Tri-state fallthrough: the day rule does not touch allow_in_person,
    // yet an in-person booking is still rejected through online_only.
    let slot = base_slot(5);
    let day = day_rule(false, true, None);

    let config = resolve(&slot, Some(&day), None);

    assert!(config.online_only);
    assert!(config.allow_in_person);
    assert!(!config.permits(AppointmentMode::InPerson));
    assert!(config.permits(AppointmentMode::Online));
}

#[test]
fn slot_rule_allow_flags_override_slot() {
    let slot = base_slot(5);
    let mut rule = slot_rule(slot.id);
    rule.allow_online = Some(false);
    rule.allow_in_person = Some(false);

    let config = resolve(&slot, None, Some(&rule));

    assert!(!config.allow_online);
    assert!(!config.allow_in_person);
    assert!(!config.permits(AppointmentMode::Online));
    assert!(!config.permits(AppointmentMode::InPerson));
}

#[test]
fn unset_allow_flags_fall_through_to_slot_not_day() {
    // A day rule never constrains the allow-mode flags directly; with the
    // slot rule tri-states unset, the slot's own flags apply verbatim.
    let mut slot = base_slot(5);
    slot.allow_online = false;
    let day = day_rule(false, false, None);
    let rule = slot_rule(slot.id);

    let config = resolve(&slot, Some(&day), Some(&rule));

    assert!(!config.allow_online);
    assert!(config.allow_in_person);
}

#[rstest]
#[case(0, 3, true)]
#[case(2, 3, true)]
#[case(3, 3, false)]
#[case(4, 3, false)]
fn availability_requires_free_capacity(
    #[case] booked: i64,
    #[case] capacity: i32,
    #[case] expected: bool,
) {
    let slot = base_slot(capacity);
    let config = resolve(&slot, None, None);

    assert_eq!(config.is_available(booked), expected);
}

#[test]
fn blocked_slot_is_never_available() {
    let slot = base_slot(3);
    let mut rule = slot_rule(slot.id);
    rule.blocked = true;

    let config = resolve(&slot, None, Some(&rule));

    assert!(!config.is_available(0));
}

#[test]
fn resolve_is_deterministic() {
    let slot = base_slot(5);
    let day = day_rule(true, true, Some(2));
    let mut rule = slot_rule(slot.id);
    rule.capacity = Some(4);
    rule.allow_online = Some(false);

    let first = resolve(&slot, Some(&day), Some(&rule));
    let second = resolve(&slot, Some(&day), Some(&rule));

    assert_eq!(first, second);
}
