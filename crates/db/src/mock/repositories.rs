use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockall::mock;
use uuid::Uuid;

use slotwise_core::errors::BookingResult;
use slotwise_core::models::appointment::{Appointment, AppointmentMode, AppointmentStatus};

use crate::models::{DbAppointment, DbDayRule, DbSlot, DbSlotRule, DbUser};

// Mock repositories for testing
mock! {
    pub SlotRepo {
        pub async fn create_slot(
            &self,
            start_at: DateTime<Utc>,
            end_at: DateTime<Utc>,
            capacity: i32,
            allow_online: bool,
            allow_in_person: bool,
        ) -> eyre::Result<DbSlot>;

        pub async fn get_slot_by_id(&self, id: Uuid) -> eyre::Result<Option<DbSlot>>;

        pub async fn find_slot_by_start(
            &self,
            start_at: DateTime<Utc>,
        ) -> eyre::Result<Option<DbSlot>>;

        pub async fn list_slots_in_range(
            &self,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
            active_only: bool,
        ) -> eyre::Result<Vec<DbSlot>>;

        pub async fn update_slot(
            &self,
            id: Uuid,
            active: Option<bool>,
            capacity: Option<i32>,
            allow_online: Option<bool>,
            allow_in_person: Option<bool>,
        ) -> eyre::Result<Option<DbSlot>>;

        pub async fn generate_slots(
            &self,
            windows: Vec<(DateTime<Utc>, DateTime<Utc>)>,
            capacity: i32,
        ) -> eyre::Result<(usize, usize)>;
    }
}

mock! {
    pub RuleRepo {
        pub async fn upsert_day_rule(
            &self,
            date: NaiveDate,
            blocked: bool,
            online_only: bool,
            default_capacity: Option<i32>,
        ) -> eyre::Result<DbDayRule>;

        pub async fn get_day_rule(&self, date: NaiveDate) -> eyre::Result<Option<DbDayRule>>;

        pub async fn list_day_rules_in_range(
            &self,
            from: NaiveDate,
            to: NaiveDate,
        ) -> eyre::Result<Vec<DbDayRule>>;

        pub async fn upsert_slot_rule(
            &self,
            slot_id: Uuid,
            blocked: bool,
            online_only: bool,
            capacity: Option<i32>,
            allow_online: Option<bool>,
            allow_in_person: Option<bool>,
        ) -> eyre::Result<DbSlotRule>;

        pub async fn get_slot_rule(&self, slot_id: Uuid) -> eyre::Result<Option<DbSlotRule>>;

        pub async fn list_slot_rules_for_slots(
            &self,
            slot_ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<DbSlotRule>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn occupancy_count(&self, slot_id: Uuid) -> eyre::Result<i64>;

        pub async fn occupancy_counts_for_slots(
            &self,
            slot_ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<(Uuid, i64)>>;

        pub async fn find_conflicting(
            &self,
            date: NaiveDate,
            time: NaiveTime,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn get_appointment_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;

        pub async fn list_appointments_by_user(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn set_status(
            &self,
            id: Uuid,
            status: AppointmentStatus,
        ) -> BookingResult<Appointment>;

        pub async fn book_slot(
            &self,
            user_id: Uuid,
            slot_id: Uuid,
            mode: AppointmentMode,
        ) -> BookingResult<Appointment>;

        pub async fn book_raw(
            &self,
            user_id: Uuid,
            date: NaiveDate,
            time: NaiveTime,
            mode: AppointmentMode,
            survey_id: Option<Uuid>,
        ) -> BookingResult<Appointment>;

        pub async fn cancel_appointment(
            &self,
            user_id: Uuid,
            appointment_id: Uuid,
        ) -> BookingResult<Appointment>;

        pub async fn reschedule_appointment(
            &self,
            user_id: Uuid,
            appointment_id: Uuid,
            new_date: NaiveDate,
            new_time: NaiveTime,
        ) -> BookingResult<Appointment>;
    }
}

mock! {
    pub UserRepo {
        pub async fn create_user(&self, email: String, name: String) -> eyre::Result<DbUser>;

        pub async fn get_user_by_id(&self, id: Uuid) -> eyre::Result<Option<DbUser>>;
    }
}
