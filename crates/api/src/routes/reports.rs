use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::reports::list_reports).post(handlers::reports::generate_report),
        )
        .route("/api/reports/:id", get(handlers::reports::get_report))
}
