//! Best-effort notification contract.
//!
//! Delivery is a collaborator concern: the booking engine fires an event
//! after the admission decision is committed and a failure here must never
//! reverse or fail the booking itself. Callers are expected to spawn the
//! notification off the request path and log errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::appointment::Appointment;
use crate::models::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingConfirmed,
    BookingCanceled,
    BookingRescheduled,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one event for one appointment. `user` carries identity
    /// info when the lookup succeeded; delivery may still proceed without
    /// it.
    async fn notify(
        &self,
        event: NotificationEvent,
        appointment: &Appointment,
        user: Option<&User>,
    ) -> eyre::Result<()>;
}
