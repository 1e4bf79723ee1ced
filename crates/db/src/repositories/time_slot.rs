use crate::{db_error, models::DbTimeSlot};
use chrono::{DateTime, Utc};
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::time_slot::TimeSlot,
    slots::PlannedSlot,
};
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use uuid::Uuid;

/// Slots of one facility in `[from, to)`, optionally only the free ones.
pub async fn list_time_slots(
    pool: &Pool<Postgres>,
    facility_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    available_only: bool,
) -> CourtResult<Vec<TimeSlot>> {
    let rows = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, facility_id, start_time, end_time, is_available, created_at
        FROM time_slots
        WHERE facility_id = $1
          AND start_time >= $2 AND start_time < $3
          AND (NOT $4 OR is_available)
        ORDER BY start_time ASC
        "#,
    )
    .bind(facility_id)
    .bind(from)
    .bind(to)
    .bind(available_only)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Free slots of every ACTIVE facility in `[from, to)`.
pub async fn list_available_slots_between(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> CourtResult<Vec<TimeSlot>> {
    let rows = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT ts.id, ts.facility_id, ts.start_time, ts.end_time, ts.is_available, ts.created_at
        FROM time_slots ts
        JOIN facilities f ON f.id = ts.facility_id
        WHERE f.status = 'ACTIVE'
          AND ts.is_available
          AND ts.start_time >= $1 AND ts.start_time < $2
        ORDER BY ts.facility_id, ts.start_time ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_time_slot_by_id<'e, E>(conn: E, id: Uuid) -> CourtResult<Option<TimeSlot>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, facility_id, start_time, end_time, is_available, created_at
        FROM time_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(db_error)?;

    Ok(row.map(Into::into))
}

/// Locks the slot row and returns it, whatever its availability.
pub async fn lock_time_slot(conn: &mut PgConnection, id: Uuid) -> CourtResult<TimeSlot> {
    let row = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, facility_id, start_time, end_time, is_available, created_at
        FROM time_slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error)?
    .ok_or_else(|| CourtError::not_found("Time slot", id))?;

    Ok(row.into())
}

/// Re-reads the slot under a row lock and takes it.
///
/// Concurrent claims of one slot serialize on the lock; every one after the
/// first sees `is_available = false` and gets a conflict.
pub async fn claim_slot(conn: &mut PgConnection, id: Uuid) -> CourtResult<TimeSlot> {
    let slot = lock_time_slot(conn, id).await?;
    if !slot.is_available {
        return Err(CourtError::Conflict(
            "Time slot is no longer available".to_string(),
        ));
    }

    set_slot_availability(conn, id, false).await?;
    Ok(TimeSlot {
        is_available: false,
        ..slot
    })
}

pub async fn release_slot(conn: &mut PgConnection, id: Uuid) -> CourtResult<()> {
    set_slot_availability(conn, id, true).await
}

async fn set_slot_availability(
    conn: &mut PgConnection,
    id: Uuid,
    is_available: bool,
) -> CourtResult<()> {
    sqlx::query("UPDATE time_slots SET is_available = $2 WHERE id = $1")
        .bind(id)
        .bind(is_available)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

/// Replaces the free future slots of a facility with `planned`.
///
/// Unavailable slots are never touched, and neither are free slots that a
/// cancelled reservation still references. Planned slots that collide with a
/// kept slot are skipped. Returns `(deleted, created)`.
pub async fn regenerate_slots(
    pool: &Pool<Postgres>,
    facility_id: Uuid,
    planned: &[PlannedSlot],
    now: DateTime<Utc>,
) -> CourtResult<(u64, u64)> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    // Serializes concurrent sweeps of one facility.
    let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM facilities WHERE id = $1 FOR UPDATE")
        .bind(facility_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;
    if locked.is_none() {
        return Err(CourtError::not_found("Facility", facility_id));
    }

    let deleted = sqlx::query(
        r#"
        DELETE FROM time_slots ts
        WHERE ts.facility_id = $1
          AND ts.is_available
          AND ts.start_time > $2
          AND NOT EXISTS (SELECT 1 FROM reservations r WHERE r.time_slot_id = ts.id)
        "#,
    )
    .bind(facility_id)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?
    .rows_affected();

    let ids: Vec<Uuid> = planned.iter().map(|_| Uuid::new_v4()).collect();
    let starts: Vec<DateTime<Utc>> = planned.iter().map(|p| p.start_time).collect();
    let ends: Vec<DateTime<Utc>> = planned.iter().map(|p| p.end_time).collect();

    let created = sqlx::query(
        r#"
        INSERT INTO time_slots (id, facility_id, start_time, end_time, is_available, created_at)
        SELECT id, $1, start_time, end_time, TRUE, $5
        FROM UNNEST($2::UUID[], $3::TIMESTAMPTZ[], $4::TIMESTAMPTZ[])
            AS planned(id, start_time, end_time)
        ON CONFLICT (facility_id, start_time) DO NOTHING
        "#,
    )
    .bind(facility_id)
    .bind(&ids)
    .bind(&starts)
    .bind(&ends)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?
    .rows_affected();

    tx.commit().await.map_err(db_error)?;

    tracing::debug!(
        "Regenerated slots for facility {}: deleted={}, created={}",
        facility_id,
        deleted,
        created
    );
    Ok((deleted, created))
}
