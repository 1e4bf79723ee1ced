use crate::{
    db_error,
    models::{convert_all, DbShift},
};
use chrono::Utc;
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::shift::{CreateShiftRequest, EmployeeShift, ShiftListQuery, UpdateShiftRequest},
};
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

const SHIFT_SELECT: &str = r#"
    SELECT s.id, s.employee_id, u.name AS employee_name,
        s.start_time, s.end_time, s.shift_type, s.notes, s.created_at
    FROM employee_shifts s
    JOIN employees e ON e.id = s.employee_id
    JOIN users u ON u.id = e.user_id
"#;

pub async fn create_shift(
    pool: &Pool<Postgres>,
    req: &CreateShiftRequest,
) -> CourtResult<EmployeeShift> {
    let id = Uuid::new_v4();

    let employee_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM employees WHERE id = $1)",
    )
    .bind(req.employee_id)
    .fetch_one(pool)
    .await
    .map_err(db_error)?;
    if !employee_exists {
        return Err(CourtError::not_found("Employee", req.employee_id));
    }

    sqlx::query(
        r#"
        INSERT INTO employee_shifts (
            id, employee_id, start_time, end_time, shift_type, notes, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(req.employee_id)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(req.shift_type.as_str())
    .bind(req.notes.as_deref())
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(db_error)?;

    get_shift_by_id(pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Shift", id))
}

pub async fn get_shift_by_id<'e, E>(conn: E, id: Uuid) -> CourtResult<Option<EmployeeShift>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, DbShift>(&format!("{SHIFT_SELECT} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_error)?;

    row.map(EmployeeShift::try_from).transpose()
}

/// Shifts overlapping `[from, to)` when those bounds are given.
pub async fn list_shifts(
    pool: &Pool<Postgres>,
    query: &ShiftListQuery,
) -> CourtResult<Vec<EmployeeShift>> {
    let rows = sqlx::query_as::<_, DbShift>(&format!(
        r#"
        {SHIFT_SELECT}
        WHERE ($1::UUID IS NULL OR s.employee_id = $1)
          AND ($2::TIMESTAMPTZ IS NULL OR s.end_time > $2)
          AND ($3::TIMESTAMPTZ IS NULL OR s.start_time < $3)
        ORDER BY s.start_time ASC
        "#
    ))
    .bind(query.employee_id)
    .bind(query.from)
    .bind(query.to)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    convert_all(rows)
}

/// Partial update. The caller validates the merged window.
pub async fn update_shift(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateShiftRequest,
) -> CourtResult<EmployeeShift> {
    let result = sqlx::query(
        r#"
        UPDATE employee_shifts SET
            start_time = COALESCE($2, start_time),
            end_time = COALESCE($3, end_time),
            shift_type = COALESCE($4, shift_type),
            notes = COALESCE($5, notes)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(req.shift_type.map(|t| t.as_str()))
    .bind(req.notes.as_deref())
    .execute(pool)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(CourtError::not_found("Shift", id));
    }

    get_shift_by_id(pool, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Shift", id))
}

pub async fn delete_shift(pool: &Pool<Postgres>, id: Uuid) -> CourtResult<()> {
    let result = sqlx::query("DELETE FROM employee_shifts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(CourtError::not_found("Shift", id));
    }
    Ok(())
}
