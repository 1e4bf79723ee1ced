use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use courtside_core::{
    errors::CourtError,
    models::time_slot::{TimeSlot, TimeSlotQuery},
    slots::local_day_bounds,
};
use courtside_db::repositories::{facility, time_slot};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

/// Every slot of a facility on a local date (today when omitted).
#[axum::debug_handler]
pub async fn list_time_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TimeSlotQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = slots_for_day(&state, &query, false).await?;
    Ok(Json(slots))
}

/// Bookable slots only: free and not yet started.
#[axum::debug_handler]
pub async fn available_time_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TimeSlotQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let now = Utc::now();
    let slots = slots_for_day(&state, &query, true)
        .await?
        .into_iter()
        .filter(|slot| slot.start_time > now)
        .collect();
    Ok(Json(slots))
}

async fn slots_for_day(
    state: &ApiState,
    query: &TimeSlotQuery,
    available_only: bool,
) -> Result<Vec<TimeSlot>, AppError> {
    facility::get_facility_by_id(&state.db_pool, query.facility_id)
        .await?
        .ok_or_else(|| CourtError::not_found("Facility", query.facility_id))?;

    let date = query
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&state.timezone()).date_naive());
    let (from, to) = local_day_bounds(date, state.timezone());

    let slots =
        time_slot::list_time_slots(&state.db_pool, query.facility_id, from, to, available_only)
            .await?;
    Ok(slots)
}
