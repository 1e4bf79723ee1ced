use crate::{
    db_error,
    models::{convert_all, DbReport, DbReservationFact, DbSlotFact},
};
use chrono::{DateTime, NaiveDate, Utc};
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::report::{Report, ReportType},
    reporting::{ReservationFact, SlotFact},
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Reservations whose slot starts within `[from, to)`; open bounds are unbounded.
pub async fn reservation_facts(
    pool: &Pool<Postgres>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> CourtResult<Vec<ReservationFact>> {
    let rows = sqlx::query_as::<_, DbReservationFact>(
        r#"
        SELECT ts.facility_id, f.name AS facility_name,
            r.activity_id, a.name AS activity_name,
            r.status, r.total_price
        FROM reservations r
        JOIN time_slots ts ON ts.id = r.time_slot_id
        JOIN facilities f ON f.id = ts.facility_id
        JOIN activities a ON a.id = r.activity_id
        WHERE ($1::TIMESTAMPTZ IS NULL OR ts.start_time >= $1)
          AND ($2::TIMESTAMPTZ IS NULL OR ts.start_time < $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    convert_all(rows)
}

pub async fn slot_facts(
    pool: &Pool<Postgres>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> CourtResult<Vec<SlotFact>> {
    let rows = sqlx::query_as::<_, DbSlotFact>(
        r#"
        SELECT ts.facility_id, f.name AS facility_name, ts.is_available
        FROM time_slots ts
        JOIN facilities f ON f.id = ts.facility_id
        WHERE ($1::TIMESTAMPTZ IS NULL OR ts.start_time >= $1)
          AND ($2::TIMESTAMPTZ IS NULL OR ts.start_time < $2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn save_report(
    pool: &Pool<Postgres>,
    report_type: ReportType,
    generated_by: Uuid,
    period_from: Option<NaiveDate>,
    period_to: Option<NaiveDate>,
    data: &serde_json::Value,
) -> CourtResult<Report> {
    let row = sqlx::query_as::<_, DbReport>(
        r#"
        INSERT INTO reports (
            id, report_type, generated_by, period_from, period_to, data, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, report_type, generated_by, period_from, period_to, data, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(report_type.as_str())
    .bind(generated_by)
    .bind(period_from)
    .bind(period_to)
    .bind(data)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(db_error)?;

    row.try_into()
}

pub async fn get_report_by_id(pool: &Pool<Postgres>, id: Uuid) -> CourtResult<Report> {
    let row = sqlx::query_as::<_, DbReport>(
        r#"
        SELECT id, report_type, generated_by, period_from, period_to, data, created_at
        FROM reports
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?
    .ok_or_else(|| CourtError::not_found("Report", id))?;

    row.try_into()
}

pub async fn list_reports(pool: &Pool<Postgres>) -> CourtResult<Vec<Report>> {
    let rows = sqlx::query_as::<_, DbReport>(
        r#"
        SELECT id, report_type, generated_by, period_from, period_to, data, created_at
        FROM reports
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    convert_all(rows)
}
