use axum::{
    routing::{patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::booking::book_slot).get(handlers::booking::list_appointments),
        )
        .route("/api/appointments/raw", post(handlers::booking::book_raw))
        .route(
            "/api/appointments/:id/cancel",
            post(handlers::booking::cancel),
        )
        .route(
            "/api/appointments/:id/reschedule",
            post(handlers::booking::reschedule),
        )
        .route(
            "/api/appointments/:id/status",
            patch(handlers::booking::set_status),
        )
}
