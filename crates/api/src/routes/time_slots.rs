use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/time-slots", get(handlers::time_slots::list_time_slots))
        .route(
            "/api/timeslots/available",
            get(handlers::time_slots::available_time_slots),
        )
}
