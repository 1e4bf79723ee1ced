use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use courtside_core::{
    errors::CourtError,
    models::reservation::{
        CancelReservationRequest, CreateReservationRequest, ManualReservationRequest, Reservation,
        ReservationListQuery, UpdateReservationRequest,
    },
    slots::local_day_bounds,
};
use courtside_db::repositories::reservation;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::{
        auth,
        error_handling::AppError,
        session::{CurrentUser, StaffUser},
    },
    ApiState,
};

/// Customers only ever see their own reservations.
#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<Arc<ApiState>>,
    CurrentUser(session): CurrentUser,
    Query(mut query): Query<ReservationListQuery>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    if !session.is_staff() {
        query.user_id = Some(session.id);
    }
    let day = query.date.map(|date| local_day_bounds(date, state.timezone()));

    let reservations = reservation::list_reservations(&state.db_pool, &query, day).await?;
    Ok(Json(reservations))
}

#[axum::debug_handler]
pub async fn get_reservation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let found = reservation::get_reservation_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Reservation", id))?;

    if !session.is_staff() && found.user_id != session.id {
        return Err(CourtError::Authorization(
            "You can only view your own reservations".to_string(),
        )
        .into());
    }
    Ok(Json(found))
}

#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<Json<Reservation>, AppError> {
    let policy = state.booking_policy().await?;

    let created = reservation::create_reservation(
        &state.db_pool,
        session.id,
        &payload,
        &policy,
        Utc::now(),
    )
    .await
    .inspect_err(|err| {
        if err.is_client_error() {
            tracing::warn!("Booking by {} rejected: {}", session.id, err);
        }
    })?;

    Ok(Json(created))
}

#[axum::debug_handler]
pub async fn update_reservation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> Result<Json<Reservation>, AppError> {
    payload.validate()?;
    let policy = state.booking_policy().await?;

    let updated = reservation::update_reservation(
        &state.db_pool,
        id,
        session.actor(),
        &payload,
        &policy,
        Utc::now(),
    )
    .await
    .inspect_err(|err| {
        if err.is_client_error() {
            tracing::warn!("Update of reservation {} by {} rejected: {}", id, session.id, err);
        }
    })?;

    Ok(Json(updated))
}

/// Shorthand for an update to `cancelled`; the body is optional.
#[axum::debug_handler]
pub async fn cancel_reservation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<CancelReservationRequest>>,
) -> Result<Json<Reservation>, AppError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate()?;
    let policy = state.booking_policy().await?;

    let cancelled = reservation::update_reservation(
        &state.db_pool,
        id,
        session.actor(),
        &UpdateReservationRequest::cancel(payload.reason),
        &policy,
        Utc::now(),
    )
    .await?;

    Ok(Json(cancelled))
}

#[axum::debug_handler]
pub async fn delete_reservation(
    State(state): State<Arc<ApiState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    reservation::delete_reservation(&state.db_pool, id).await?;
    tracing::info!("Staff {} deleted reservation {}", staff.id, id);
    Ok(StatusCode::NO_CONTENT)
}

/// Booking made by staff on a customer's behalf.
#[axum::debug_handler]
pub async fn manual_reservation(
    State(state): State<Arc<ApiState>>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<ManualReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    payload.validate()?;
    let policy = state.booking_policy().await?;

    // Only needed if the email turns out to be unknown.
    let new_user_password_hash = match (&payload.user_id, &payload.email) {
        (None, Some(_)) => Some(auth::hash_password(&auth::random_password())?),
        _ => None,
    };

    let created = reservation::manual_reservation(
        &state.db_pool,
        staff.actor(),
        &payload,
        new_user_password_hash.as_deref(),
        &policy,
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
