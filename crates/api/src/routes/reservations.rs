use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/reservations",
            get(handlers::reservations::list_reservations)
                .post(handlers::reservations::create_reservation),
        )
        .route(
            "/api/reservations/manual",
            post(handlers::reservations::manual_reservation),
        )
        .route(
            "/api/reservations/:id",
            get(handlers::reservations::get_reservation)
                .patch(handlers::reservations::update_reservation)
                .delete(handlers::reservations::delete_reservation),
        )
        .route(
            "/api/reservations/:id/cancel",
            post(handlers::reservations::cancel_reservation),
        )
}
