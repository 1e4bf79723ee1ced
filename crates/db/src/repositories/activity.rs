use crate::{db_error, models::DbActivity};
use chrono::Utc;
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::activity::{Activity, CreateActivityRequest, UpdateActivityRequest},
};
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use uuid::Uuid;

const ACTIVITY_SELECT: &str = r#"
    SELECT a.id, a.name, a.description, a.duration_minutes, a.price,
        a.max_participants, a.is_active,
        ARRAY(
            SELECT fa.facility_id FROM facility_activities fa
            WHERE fa.activity_id = a.id ORDER BY fa.facility_id
        ) AS facility_ids,
        a.created_at, a.updated_at
    FROM activities a
"#;

pub async fn create_activity(
    pool: &Pool<Postgres>,
    req: &CreateActivityRequest,
) -> CourtResult<Activity> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating activity: id={}, name={}", id, req.name);

    let mut tx = pool.begin().await.map_err(db_error)?;

    sqlx::query(
        r#"
        INSERT INTO activities (
            id, name, description, duration_minutes, price,
            max_participants, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.description.as_deref())
    .bind(req.duration_minutes)
    .bind(req.price)
    .bind(req.max_participants)
    .bind(req.is_active.unwrap_or(true))
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    replace_facility_links(&mut *tx, id, &req.facility_ids).await?;

    let activity = get_activity_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Activity", id))?;

    tx.commit().await.map_err(db_error)?;
    Ok(activity)
}

pub async fn get_activity_by_id<'e, E>(conn: E, id: Uuid) -> CourtResult<Option<Activity>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, DbActivity>(&format!("{ACTIVITY_SELECT} WHERE a.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_error)?;

    Ok(row.map(Into::into))
}

pub async fn list_activities(
    pool: &Pool<Postgres>,
    active_only: bool,
    facility_id: Option<Uuid>,
) -> CourtResult<Vec<Activity>> {
    let rows = sqlx::query_as::<_, DbActivity>(&format!(
        r#"
        {ACTIVITY_SELECT}
        WHERE (NOT $1 OR a.is_active)
          AND ($2::UUID IS NULL OR EXISTS (
                SELECT 1 FROM facility_activities fa
                WHERE fa.activity_id = a.id AND fa.facility_id = $2
          ))
        ORDER BY a.name ASC
        "#
    ))
    .bind(active_only)
    .bind(facility_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn update_activity(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateActivityRequest,
) -> CourtResult<Activity> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let result = sqlx::query(
        r#"
        UPDATE activities SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            duration_minutes = COALESCE($4, duration_minutes),
            price = COALESCE($5, price),
            max_participants = COALESCE($6, max_participants),
            is_active = COALESCE($7, is_active),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.name.as_deref())
    .bind(req.description.as_deref())
    .bind(req.duration_minutes)
    .bind(req.price)
    .bind(req.max_participants)
    .bind(req.is_active)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(CourtError::not_found("Activity", id));
    }

    if let Some(facility_ids) = &req.facility_ids {
        replace_facility_links(&mut *tx, id, facility_ids).await?;
    }

    let activity = get_activity_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Activity", id))?;

    tx.commit().await.map_err(db_error)?;
    Ok(activity)
}

pub async fn delete_activity(pool: &Pool<Postgres>, id: Uuid) -> CourtResult<()> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM activities WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;
    if locked.is_none() {
        return Err(CourtError::not_found("Activity", id));
    }

    let referenced = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM reservations WHERE activity_id = $1)",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    if referenced {
        return Err(CourtError::Conflict(
            "Activity has reservations and cannot be deleted".to_string(),
        ));
    }

    sqlx::query("DELETE FROM activities WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;
    tracing::debug!("Deleted activity {}", id);
    Ok(())
}

/// Whether the activity is offered at the facility.
pub async fn is_linked<'e, E>(conn: E, facility_id: Uuid, activity_id: Uuid) -> CourtResult<bool>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM facility_activities
            WHERE facility_id = $1 AND activity_id = $2
        )
        "#,
    )
    .bind(facility_id)
    .bind(activity_id)
    .fetch_one(conn)
    .await
    .map_err(db_error)
}

async fn replace_facility_links(
    conn: &mut PgConnection,
    activity_id: Uuid,
    facility_ids: &[Uuid],
) -> CourtResult<()> {
    sqlx::query("DELETE FROM facility_activities WHERE activity_id = $1")
        .bind(activity_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    if facility_ids.is_empty() {
        return Ok(());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO facility_activities (facility_id, activity_id)
        SELECT f.id, $1 FROM facilities f WHERE f.id = ANY($2)
        "#,
    )
    .bind(activity_id)
    .bind(facility_ids)
    .execute(&mut *conn)
    .await
    .map_err(db_error)?;

    let mut unique = facility_ids.to_vec();
    unique.sort();
    unique.dedup();
    if result.rows_affected() != unique.len() as u64 {
        return Err(CourtError::NotFound(
            "One or more facilities do not exist".to_string(),
        ));
    }

    Ok(())
}
