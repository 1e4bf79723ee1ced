use crate::{
    db_error,
    models::{convert_all, DbFacility},
};
use chrono::Utc;
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::facility::{
        CreateFacilityRequest, Facility, FacilityStatus, UpdateFacilityRequest,
    },
};
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use uuid::Uuid;

const FACILITY_SELECT: &str = r#"
    SELECT f.id, f.name, f.description, f.location, f.capacity,
        f.opening_hour, f.closing_hour, f.status,
        COALESCE(
            ARRAY(
                SELECT fa.activity_id FROM facility_activities fa
                WHERE fa.facility_id = f.id ORDER BY fa.activity_id
            ),
            '{}'
        ) AS activity_ids,
        f.created_at, f.updated_at
    FROM facilities f
"#;

pub async fn create_facility(
    pool: &Pool<Postgres>,
    req: &CreateFacilityRequest,
) -> CourtResult<Facility> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let status = req.status.unwrap_or(FacilityStatus::Active);

    tracing::debug!("Creating facility: id={}, name={}", id, req.name);

    let mut tx = pool.begin().await.map_err(db_error)?;

    sqlx::query(
        r#"
        INSERT INTO facilities (
            id, name, description, location, capacity,
            opening_hour, closing_hour, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.description.as_deref())
    .bind(req.location.as_deref())
    .bind(req.capacity)
    .bind(req.opening_hour)
    .bind(req.closing_hour)
    .bind(status.as_str())
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    replace_activity_links(&mut *tx, id, &req.activity_ids).await?;

    let facility = get_facility_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Facility", id))?;

    tx.commit().await.map_err(db_error)?;
    Ok(facility)
}

pub async fn get_facility_by_id<'e, E>(conn: E, id: Uuid) -> CourtResult<Option<Facility>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, DbFacility>(&format!("{FACILITY_SELECT} WHERE f.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_error)?;

    row.map(Facility::try_from).transpose()
}

pub async fn list_facilities(
    pool: &Pool<Postgres>,
    status: Option<FacilityStatus>,
) -> CourtResult<Vec<Facility>> {
    let rows = sqlx::query_as::<_, DbFacility>(&format!(
        "{FACILITY_SELECT} WHERE ($1::TEXT IS NULL OR f.status = $1) ORDER BY f.name ASC"
    ))
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    convert_all(rows)
}

/// Applies a partial update. The caller validates the merged operating hours.
pub async fn update_facility(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateFacilityRequest,
) -> CourtResult<Facility> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let result = sqlx::query(
        r#"
        UPDATE facilities SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            location = COALESCE($4, location),
            capacity = COALESCE($5, capacity),
            opening_hour = COALESCE($6, opening_hour),
            closing_hour = COALESCE($7, closing_hour),
            status = COALESCE($8, status),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.name.as_deref())
    .bind(req.description.as_deref())
    .bind(req.location.as_deref())
    .bind(req.capacity)
    .bind(req.opening_hour)
    .bind(req.closing_hour)
    .bind(req.status.map(|s| s.as_str()))
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(CourtError::not_found("Facility", id));
    }

    if let Some(activity_ids) = &req.activity_ids {
        replace_activity_links(&mut *tx, id, activity_ids).await?;
    }

    let facility = get_facility_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Facility", id))?;

    tx.commit().await.map_err(db_error)?;
    Ok(facility)
}

/// Deletes the facility with its slots and activity links. Refused while any
/// reservation, cancelled or not, still points at one of its slots.
pub async fn delete_facility(pool: &Pool<Postgres>, id: Uuid) -> CourtResult<()> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM facilities WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;
    if locked.is_none() {
        return Err(CourtError::not_found("Facility", id));
    }

    let referenced = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM reservations r
            JOIN time_slots ts ON ts.id = r.time_slot_id
            WHERE ts.facility_id = $1
        )
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    if referenced {
        return Err(CourtError::Conflict(
            "Facility has reservations and cannot be deleted".to_string(),
        ));
    }

    sqlx::query("DELETE FROM facilities WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;
    tracing::debug!("Deleted facility {}", id);
    Ok(())
}

/// Facility status, read under a share lock so a concurrent status change
/// waits for the booking transaction.
pub async fn lock_facility_status(
    conn: &mut PgConnection,
    id: Uuid,
) -> CourtResult<FacilityStatus> {
    let status = sqlx::query_scalar::<_, String>(
        "SELECT status FROM facilities WHERE id = $1 FOR SHARE",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error)?
    .ok_or_else(|| CourtError::not_found("Facility", id))?;

    status.parse()
}

async fn replace_activity_links(
    conn: &mut PgConnection,
    facility_id: Uuid,
    activity_ids: &[Uuid],
) -> CourtResult<()> {
    sqlx::query("DELETE FROM facility_activities WHERE facility_id = $1")
        .bind(facility_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    if activity_ids.is_empty() {
        return Ok(());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO facility_activities (facility_id, activity_id)
        SELECT $1, a.id FROM activities a WHERE a.id = ANY($2)
        "#,
    )
    .bind(facility_id)
    .bind(activity_ids)
    .execute(&mut *conn)
    .await
    .map_err(db_error)?;

    let mut unique = activity_ids.to_vec();
    unique.sort();
    unique.dedup();
    if result.rows_affected() != unique.len() as u64 {
        return Err(CourtError::NotFound(
            "One or more activities do not exist".to_string(),
        ));
    }

    Ok(())
}
