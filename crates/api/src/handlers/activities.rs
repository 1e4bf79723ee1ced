use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use courtside_core::{
    errors::CourtError,
    models::activity::{Activity, ActivityListQuery, CreateActivityRequest, UpdateActivityRequest},
};
use courtside_db::repositories::activity;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::{error_handling::AppError, session::AdminUser},
    ApiState,
};

#[axum::debug_handler]
pub async fn list_activities(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let activities =
        activity::list_activities(&state.db_pool, query.active_only, query.facility_id).await?;
    Ok(Json(activities))
}

#[axum::debug_handler]
pub async fn get_activity(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Activity>, AppError> {
    let activity = activity::get_activity_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Activity", id))?;
    Ok(Json(activity))
}

#[axum::debug_handler]
pub async fn create_activity(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    payload.validate()?;

    let created = activity::create_activity(&state.db_pool, &payload).await?;
    tracing::info!("Created activity {} ({})", created.id, created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update_activity(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>, AppError> {
    payload.validate()?;

    let updated = activity::update_activity(&state.db_pool, id, &payload).await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_activity(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    activity::delete_activity(&state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
