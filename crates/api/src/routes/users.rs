use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/api/users/search", get(handlers::users::search_users))
        .route(
            "/api/users/:id",
            patch(handlers::users::update_user).delete(handlers::users::delete_user),
        )
}
