//! Notification sinks.
//!
//! Delivery here is intentionally best effort: the admission decision is
//! already committed by the time a notifier runs, and a failure is logged
//! and dropped rather than propagated.

use async_trait::async_trait;
use tracing::info;

use slotwise_core::models::appointment::Appointment;
use slotwise_core::models::user::User;
use slotwise_core::notify::{NotificationEvent, Notifier};

/// Notifier that records deliveries in the log stream. Stands in for the
/// external mail/messaging collaborator in deployments without one.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(
        &self,
        event: NotificationEvent,
        appointment: &Appointment,
        user: Option<&User>,
    ) -> eyre::Result<()> {
        let recipient = user.map(|u| u.email.as_str()).unwrap_or("<unknown>");
        info!(
            "Notification {:?} for appointment {} at {} {} to {}",
            event, appointment.id, appointment.date, appointment.time, recipient
        );
        Ok(())
    }
}
