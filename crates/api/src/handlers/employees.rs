use axum::{extract::State, Json};
use courtside_core::models::user::Employee;
use courtside_db::repositories::user;
use std::sync::Arc;

use crate::{
    middleware::{error_handling::AppError, session::StaffUser},
    ApiState,
};

#[axum::debug_handler]
pub async fn list_employees(
    State(state): State<Arc<ApiState>>,
    _staff: StaffUser,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = user::list_employees(&state.db_pool).await?;
    Ok(Json(employees))
}
