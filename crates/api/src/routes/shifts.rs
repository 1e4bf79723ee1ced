use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/shifts",
            get(handlers::shifts::list_shifts).post(handlers::shifts::create_shift),
        )
        .route(
            "/api/shifts/:id",
            put(handlers::shifts::update_shift).delete(handlers::shifts::delete_shift),
        )
        .route("/api/employees", get(handlers::employees::list_employees))
}
