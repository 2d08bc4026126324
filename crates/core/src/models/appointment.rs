use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentMode {
    InPerson,
    Online,
}

impl AppointmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentMode::InPerson => "in_person",
            AppointmentMode::Online => "online",
        }
    }
}

impl fmt::Display for AppointmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentMode {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_person" => Ok(AppointmentMode::InPerson),
            "online" => Ok(AppointmentMode::Online),
            other => Err(BookingError::Validation(format!(
                "Unknown appointment mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Canceled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(AppointmentStatus::Upcoming),
            "completed" => Ok(AppointmentStatus::Completed),
            "canceled" => Ok(AppointmentStatus::Canceled),
            "no_show" => Ok(AppointmentStatus::NoShow),
            other => Err(BookingError::Validation(format!(
                "Unknown appointment status: {other}"
            ))),
        }
    }
}

/// A ledger entry. The set of entries with status `upcoming` determines a
/// slot's current occupancy; there is no separate counter to keep in sync.
///
/// `date`/`time` carry the calendar representation the client booked
/// against, `start_at`/`end_at` the derived UTC instants. `slot_id` is
/// absent for entries created through the legacy raw path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mode: AppointmentMode,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub slot_id: Option<Uuid>,
    pub survey_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub mode: AppointmentMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRawRequest {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mode: AppointmentMode,
    pub survey_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAppointmentsResponse {
    pub appointments: Vec<Appointment>,
}
