use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use courtside_core::{
    errors::CourtError,
    models::{
        shift::{
            validate_shift_window, CreateShiftRequest, EmployeeShift, ShiftListQuery,
            UpdateShiftRequest,
        },
        user::Role,
    },
};
use courtside_db::repositories::{shift, user};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::{
        error_handling::AppError,
        session::{AdminUser, StaffUser},
    },
    ApiState,
};

/// Employees see only their own shifts; admins see everyone's.
#[axum::debug_handler]
pub async fn list_shifts(
    State(state): State<Arc<ApiState>>,
    StaffUser(staff): StaffUser,
    Query(mut query): Query<ShiftListQuery>,
) -> Result<Json<Vec<EmployeeShift>>, AppError> {
    if staff.role == Role::Employee {
        match user::get_employee_by_user_id(&state.db_pool, staff.id).await? {
            Some(employee) => query.employee_id = Some(employee.id),
            None => return Ok(Json(Vec::new())),
        }
    }

    let shifts = shift::list_shifts(&state.db_pool, &query).await?;
    Ok(Json(shifts))
}

#[axum::debug_handler]
pub async fn create_shift(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateShiftRequest>,
) -> Result<(StatusCode, Json<EmployeeShift>), AppError> {
    payload.validate()?;
    validate_shift_window(payload.start_time, payload.end_time)?;

    let created = shift::create_shift(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update_shift(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShiftRequest>,
) -> Result<Json<EmployeeShift>, AppError> {
    payload.validate()?;

    let current = shift::get_shift_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Shift", id))?;
    validate_shift_window(
        payload.start_time.unwrap_or(current.start_time),
        payload.end_time.unwrap_or(current.end_time),
    )?;

    let updated = shift::update_shift(&state.db_pool, id, &payload).await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_shift(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    shift::delete_shift(&state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
