use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use courtside_core::{
    errors::CourtError,
    models::facility::{
        validate_operating_hours, AvailabilityQuery, CreateFacilityRequest, Facility,
        FacilityAvailability, FacilityListQuery, FacilityStatus, GenerateSlotsResponse,
        UpdateFacilityRequest,
    },
    slots::{local_day_bounds, plan_hourly_slots},
};
use courtside_db::repositories::{facility, time_slot};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::{error_handling::AppError, session::AdminUser},
    ApiState,
};

#[axum::debug_handler]
pub async fn list_facilities(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<FacilityListQuery>,
) -> Result<Json<Vec<Facility>>, AppError> {
    let facilities = facility::list_facilities(&state.db_pool, query.status).await?;
    Ok(Json(facilities))
}

#[axum::debug_handler]
pub async fn get_facility(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Facility>, AppError> {
    let facility = facility::get_facility_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Facility", id))?;
    Ok(Json(facility))
}

#[axum::debug_handler]
pub async fn create_facility(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<Facility>), AppError> {
    payload.validate()?;
    validate_operating_hours(payload.opening_hour, payload.closing_hour)?;

    let created = facility::create_facility(&state.db_pool, &payload).await?;
    tracing::info!("Created facility {} ({})", created.id, created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update_facility(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFacilityRequest>,
) -> Result<Json<Facility>, AppError> {
    payload.validate()?;

    let current = facility::get_facility_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Facility", id))?;
    validate_operating_hours(
        payload.opening_hour.unwrap_or(current.opening_hour),
        payload.closing_hour.unwrap_or(current.closing_hour),
    )?;

    let updated = facility::update_facility(&state.db_pool, id, &payload).await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_facility(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    facility::delete_facility(&state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Runs the slot generation sweep for one facility.
#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerateSlotsResponse>, AppError> {
    let facility = facility::get_facility_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Facility", id))?;

    if facility.status != FacilityStatus::Active {
        return Err(CourtError::Validation(format!(
            "Cannot generate slots for a facility with status {}",
            facility.status
        ))
        .into());
    }

    let now = Utc::now();
    let today = now.with_timezone(&state.timezone()).date_naive();
    let planned = plan_hourly_slots(
        facility.opening_hour,
        facility.closing_hour,
        today,
        state.config.slot_generation_days,
        state.timezone(),
        now,
    );

    let (deleted, created) = time_slot::regenerate_slots(&state.db_pool, id, &planned, now).await?;

    tracing::info!(
        "Admin {} regenerated slots for facility {}: deleted={}, created={}",
        admin.id,
        id,
        deleted,
        created
    );
    Ok(Json(GenerateSlotsResponse {
        facility_id: id,
        deleted,
        created,
    }))
}

/// Free, not yet started slots of every ACTIVE facility on a local date.
#[axum::debug_handler]
pub async fn availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<FacilityAvailability>>, AppError> {
    let now = Utc::now();
    let (from, to) = local_day_bounds(query.date, state.timezone());

    let facilities = facility::list_facilities(&state.db_pool, Some(FacilityStatus::Active)).await?;
    let slots = time_slot::list_available_slots_between(&state.db_pool, from.max(now), to).await?;

    let availability = facilities
        .into_iter()
        .map(|f| FacilityAvailability {
            facility_id: f.id,
            available_slots: slots
                .iter()
                .filter(|slot| slot.facility_id == f.id)
                .cloned()
                .collect(),
            facility_name: f.name,
            opening_hour: f.opening_hour,
            closing_hour: f.closing_hour,
        })
        .collect();

    Ok(Json(availability))
}
