//! Window layout for batch slot generation and the legacy raw path.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::errors::{BookingError, BookingResult};

/// First bookable hour of a generated day.
pub const DAY_START_HOUR: u32 = 9;
/// Daily cutoff; a window whose end would pass this hour is skipped.
pub const DAY_CUTOFF_HOUR: u32 = 17;
/// Base capacity assigned to generated slots.
pub const DEFAULT_SLOT_CAPACITY: i32 = 1;
/// Appointment length used when no slot defines one (raw path, reschedule).
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// Lays out back-to-back windows for every day in `[from, to]`.
///
/// Each day is filled from the daily start offset until the cutoff;
/// windows are contiguous and a final partial window is dropped rather
/// than truncated. The layout itself is pure; skipping windows that
/// already exist as slots is the caller's job.
pub fn layout_windows(
    from: NaiveDate,
    to: NaiveDate,
    duration_minutes: i64,
) -> BookingResult<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
    if duration_minutes <= 0 {
        return Err(BookingError::Validation(format!(
            "Slot duration must be positive, got {duration_minutes} minutes"
        )));
    }
    if from > to {
        return Err(BookingError::Validation(format!(
            "Invalid date range: {from} is after {to}"
        )));
    }

    let step = Duration::minutes(duration_minutes);
    let mut windows = Vec::new();
    let mut day = from;
    while day <= to {
        if let (Some(open), Some(cutoff)) = (
            day.and_hms_opt(DAY_START_HOUR, 0, 0),
            day.and_hms_opt(DAY_CUTOFF_HOUR, 0, 0),
        ) {
            let mut start = open;
            while start + step <= cutoff {
                windows.push((start.and_utc(), (start + step).and_utc()));
                start += step;
            }
        }
        day = day
            .succ_opt()
            .ok_or_else(|| BookingError::Validation("Date range end is out of bounds".to_string()))?;
    }

    Ok(windows)
}

/// Derives the UTC window for an appointment booked against a calendar
/// date and time. Calendar fields are interpreted on the UTC timeline.
pub fn appointment_window(
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(time).and_utc();
    (start, start + Duration::minutes(duration_minutes))
}
