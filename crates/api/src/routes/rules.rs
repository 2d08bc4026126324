use axum::{routing::put, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/rules/day/:date", put(handlers::rules::upsert_day_rule))
        .route(
            "/api/rules/slot/:slot_id",
            put(handlers::rules::upsert_slot_rule),
        )
}
