use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", get(handlers::slots::list_available_slots))
        .route("/api/slots/generate", post(handlers::slots::generate_slots))
        .route("/api/slots/:id", patch(handlers::slots::update_slot))
}
