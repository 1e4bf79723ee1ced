use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/facilities",
            get(handlers::facilities::list_facilities).post(handlers::facilities::create_facility),
        )
        .route(
            "/api/facilities/availability",
            get(handlers::facilities::availability),
        )
        .route(
            "/api/facilities/:id",
            get(handlers::facilities::get_facility)
                .put(handlers::facilities::update_facility)
                .delete(handlers::facilities::delete_facility),
        )
        .route(
            "/api/facilities/:id/generate-slots",
            post(handlers::facilities::generate_slots),
        )
}
