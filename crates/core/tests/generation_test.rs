use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use slotwise_core::errors::BookingError;
use slotwise_core::generation::{
    appointment_window, layout_windows, DAY_CUTOFF_HOUR, DAY_START_HOUR,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn single_day_thirty_minute_layout() {
    let day = date(2024, 1, 1);
    let windows = layout_windows(day, day, 30).unwrap();

    // 09:00 to 17:00 in 30-minute steps
    assert_eq!(windows.len(), 16);
    assert_eq!(
        windows[0].0,
        Utc.with_ymd_and_hms(2024, 1, 1, DAY_START_HOUR, 0, 0).unwrap()
    );
    assert_eq!(
        windows[0].1,
        Utc.with_ymd_and_hms(2024, 1, 1, DAY_START_HOUR, 30, 0).unwrap()
    );
    assert_eq!(
        windows.last().unwrap().1,
        Utc.with_ymd_and_hms(2024, 1, 1, DAY_CUTOFF_HOUR, 0, 0).unwrap()
    );
}

#[test]
fn windows_are_back_to_back() {
    let day = date(2024, 1, 1);
    let windows = layout_windows(day, day, 45).unwrap();

    for pair in windows.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
    }
}

#[test]
fn partial_final_window_is_dropped() {
    // 8 hours do not divide evenly by 45 minutes; the layout must stop at
    // the last window that still ends on or before the cutoff.
    let day = date(2024, 1, 1);
    let windows = layout_windows(day, day, 45).unwrap();

    assert_eq!(windows.len(), 10);
    assert!(
        windows.last().unwrap().1 <= Utc.with_ymd_and_hms(2024, 1, 1, DAY_CUTOFF_HOUR, 0, 0).unwrap()
    );
}

#[test]
fn multi_day_range_lays_out_every_day() {
    let windows = layout_windows(date(2024, 1, 1), date(2024, 1, 3), 60).unwrap();

    assert_eq!(windows.len(), 3 * 8);
    assert_eq!(
        windows[8].0,
        Utc.with_ymd_and_hms(2024, 1, 2, DAY_START_HOUR, 0, 0).unwrap()
    );
}

#[test]
fn duration_longer_than_day_yields_no_windows() {
    let day = date(2024, 1, 1);
    let windows = layout_windows(day, day, 9 * 60).unwrap();

    assert!(windows.is_empty());
}

#[rstest]
#[case(0)]
#[case(-30)]
fn non_positive_duration_is_rejected(#[case] minutes: i64) {
    let day = date(2024, 1, 1);
    let result = layout_windows(day, day, minutes);

    assert!(matches!(result, Err(BookingError::Validation(_))));
}

#[test]
fn inverted_range_is_rejected() {
    let result = layout_windows(date(2024, 1, 2), date(2024, 1, 1), 30);

    assert!(matches!(result, Err(BookingError::Validation(_))));
}

#[test]
fn layout_is_idempotent() {
    let first = layout_windows(date(2024, 1, 1), date(2024, 1, 1), 30).unwrap();
    let second = layout_windows(date(2024, 1, 1), date(2024, 1, 1), 30).unwrap();

    assert_eq!(first, second);
}

#[test]
fn appointment_window_derives_utc_instants() {
    let (start, end) = appointment_window(
        date(2024, 3, 10),
        NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        30,
    );

    assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap());
}
