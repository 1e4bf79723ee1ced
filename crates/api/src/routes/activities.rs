use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/activities",
            get(handlers::activities::list_activities).post(handlers::activities::create_activity),
        )
        .route(
            "/api/activities/:id",
            get(handlers::activities::get_activity)
                .put(handlers::activities::update_activity)
                .delete(handlers::activities::delete_activity),
        )
}
