use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use courtside_core::{
    models::report::{GenerateReportRequest, Report, ReportSummary, ReportType},
    reporting::build_report,
    slots::local_day_bounds,
};
use courtside_db::repositories::report;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{error_handling::AppError, session::AdminUser},
    ApiState,
};

/// Aggregates the requested period and stores the result.
#[axum::debug_handler]
pub async fn generate_report(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<GenerateReportRequest>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    payload.validate_period()?;

    let tz = state.timezone();
    let from = payload.from.map(|d| local_day_bounds(d, tz).0);
    let to = payload.to.map(|d| local_day_bounds(d, tz).0);

    let reservations = report::reservation_facts(&state.db_pool, from, to).await?;
    let slots = match payload.report_type {
        ReportType::OccupancyByFacility => report::slot_facts(&state.db_pool, from, to).await?,
        _ => Vec::new(),
    };
    let data = build_report(payload.report_type, &reservations, &slots);

    let saved = report::save_report(
        &state.db_pool,
        payload.report_type,
        admin.id,
        payload.from,
        payload.to,
        &data,
    )
    .await?;

    tracing::info!("Admin {} generated {} report {}", admin.id, saved.report_type, saved.id);
    Ok((StatusCode::CREATED, Json(saved)))
}

#[axum::debug_handler]
pub async fn list_reports(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<ReportSummary>>, AppError> {
    let reports = report::list_reports(&state.db_pool).await?;
    Ok(Json(reports.into_iter().map(ReportSummary::from).collect()))
}

#[axum::debug_handler]
pub async fn get_report(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, AppError> {
    Ok(Json(report::get_report_by_id(&state.db_pool, id).await?))
}
