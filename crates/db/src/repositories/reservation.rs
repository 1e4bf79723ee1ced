//! Reservation queries and the transactional booking flows.
//!
//! Every flow that flips slot availability runs in a single transaction and
//! takes the slot row lock before looking at `is_available`. Returning early
//! with an error drops the transaction, which rolls it back.

use crate::{
    db_error,
    models::{convert_all, DbReservation, DbReservationRow},
    repositories::{
        activity::{get_activity_by_id, is_linked},
        facility::lock_facility_status,
        time_slot::{claim_slot, get_time_slot_by_id, lock_time_slot, release_slot},
        user::{get_user_by_email, get_user_by_id, insert_user, NewUser},
    },
};
use chrono::{DateTime, Utc};
use courtside_core::{
    booking::{
        check_activity_bookable, check_facility_open, check_status_transition, Actor,
        BookingPolicy,
    },
    errors::{CourtError, CourtResult},
    models::{
        reservation::{
            CreateReservationRequest, ManualReservationRequest, Reservation,
            ReservationListQuery, ReservationStatus, UpdateReservationRequest,
        },
        user::Role,
    },
};
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use uuid::Uuid;

const RESERVATION_SELECT: &str = r#"
    SELECT r.id, r.user_id, u.name AS user_name,
        r.activity_id, a.name AS activity_name,
        r.time_slot_id, ts.facility_id, f.name AS facility_name,
        ts.start_time, ts.end_time,
        r.status, r.total_price, r.cancellation_reason, r.notes,
        r.created_at, r.updated_at
    FROM reservations r
    JOIN users u ON u.id = r.user_id
    JOIN activities a ON a.id = r.activity_id
    JOIN time_slots ts ON ts.id = r.time_slot_id
    JOIN facilities f ON f.id = ts.facility_id
"#;

pub struct NewReservation<'a> {
    pub user_id: Uuid,
    pub activity_id: Uuid,
    pub time_slot_id: Uuid,
    pub status: ReservationStatus,
    pub total_price: i64,
    pub notes: Option<&'a str>,
}

pub async fn get_reservation_by_id<'e, E>(conn: E, id: Uuid) -> CourtResult<Option<Reservation>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, DbReservation>(&format!("{RESERVATION_SELECT} WHERE r.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_error)?;

    row.map(Reservation::try_from).transpose()
}

/// Lists reservations matching the filters. `day` is the UTC range of the
/// requested local date, if any.
pub async fn list_reservations(
    pool: &Pool<Postgres>,
    query: &ReservationListQuery,
    day: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> CourtResult<Vec<Reservation>> {
    let (from, to) = day.unzip();
    let rows = sqlx::query_as::<_, DbReservation>(&format!(
        r#"
        {RESERVATION_SELECT}
        WHERE ($1::TEXT IS NULL OR r.status = $1)
          AND ($2::UUID IS NULL OR ts.facility_id = $2)
          AND ($3::UUID IS NULL OR r.user_id = $3)
          AND ($4::TIMESTAMPTZ IS NULL OR ts.start_time >= $4)
          AND ($5::TIMESTAMPTZ IS NULL OR ts.start_time < $5)
        ORDER BY ts.start_time DESC
        "#
    ))
    .bind(query.status.map(|s| s.as_str()))
    .bind(query.facility_id)
    .bind(query.user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    convert_all(rows)
}

/// Pending and confirmed reservations of the user whose slot has not started.
pub async fn count_active_reservations<'e, E>(
    conn: E,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> CourtResult<i64>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM reservations r
        JOIN time_slots ts ON ts.id = r.time_slot_id
        WHERE r.user_id = $1
          AND r.status IN ('pending', 'confirmed')
          AND ts.start_time > $2
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(db_error)
}

pub async fn insert_reservation<'e, E>(conn: E, new: &NewReservation<'_>) -> CourtResult<Uuid>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO reservations (
            id, user_id, activity_id, time_slot_id, status,
            total_price, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        "#,
    )
    .bind(id)
    .bind(new.user_id)
    .bind(new.activity_id)
    .bind(new.time_slot_id)
    .bind(new.status.as_str())
    .bind(new.total_price)
    .bind(new.notes)
    .bind(now)
    .execute(conn)
    .await
    .map_err(db_error)?;

    Ok(id)
}

/// Books a slot for a customer.
///
/// Checks run in order: active-reservation limit, slot ownership and
/// availability, lead time, facility status, activity status and linkage.
/// The slot is then claimed under its row lock and the reservation inserted
/// as `pending` with the activity price as snapshot.
pub async fn create_reservation(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    req: &CreateReservationRequest,
    policy: &BookingPolicy,
    now: DateTime<Utc>,
) -> CourtResult<Reservation> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    // Serializes concurrent bookings by the same user so the limit holds.
    lock_user(&mut *tx, user_id).await?;

    let active = count_active_reservations(&mut *tx, user_id, now).await?;
    policy.check_active_limit(active)?;

    let slot = get_time_slot_by_id(&mut *tx, req.time_slot_id)
        .await?
        .ok_or_else(|| CourtError::not_found("Time slot", req.time_slot_id))?;
    policy.check_slot_bookable(&slot, req.facility_id, now)?;
    policy.check_lead_time(slot.start_time, now)?;

    check_facility_open(lock_facility_status(&mut *tx, req.facility_id).await?)?;

    let activity = get_activity_by_id(&mut *tx, req.activity_id)
        .await?
        .ok_or_else(|| CourtError::not_found("Activity", req.activity_id))?;
    let linked = is_linked(&mut *tx, req.facility_id, req.activity_id).await?;
    check_activity_bookable(activity.is_active, linked)?;

    claim_slot(&mut *tx, slot.id).await?;
    let id = insert_reservation(
        &mut *tx,
        &NewReservation {
            user_id,
            activity_id: activity.id,
            time_slot_id: slot.id,
            status: ReservationStatus::Pending,
            total_price: activity.price,
            notes: None,
        },
    )
    .await?;

    let reservation = get_reservation_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Reservation", id))?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        "Reservation {} created for user {} on slot {}",
        id,
        user_id,
        slot.id
    );
    Ok(reservation)
}

/// Single entry point for status changes, rebooking, cancellation and notes.
pub async fn update_reservation(
    pool: &Pool<Postgres>,
    id: Uuid,
    actor: Actor,
    req: &UpdateReservationRequest,
    policy: &BookingPolicy,
    now: DateTime<Utc>,
) -> CourtResult<Reservation> {
    if req.is_empty() {
        return Err(CourtError::Validation("No changes requested".to_string()));
    }

    let mut tx = pool.begin().await.map_err(db_error)?;

    let row = lock_reservation(&mut *tx, id).await?;
    authorize_update(&actor, &row, req)?;

    let current: ReservationStatus = row.status.parse()?;
    let next = req.status.unwrap_or(current);
    check_status_transition(current, next)?;

    let current_slot = lock_time_slot(&mut *tx, row.time_slot_id).await?;
    let requested_slot = req.time_slot_id.filter(|slot_id| *slot_id != row.time_slot_id);
    let mut slot_id = row.time_slot_id;

    match (current.is_active(), next.is_active()) {
        (true, false) => {
            if requested_slot.is_some() {
                return Err(CourtError::Validation(
                    "Cannot move and cancel a reservation at the same time".to_string(),
                ));
            }
            policy.check_cancellation_deadline(current_slot.start_time, now)?;
            release_slot(&mut *tx, current_slot.id).await?;
        }
        (false, true) => {
            if !actor.is_staff() {
                let active = count_active_reservations(&mut *tx, row.user_id, now).await?;
                policy.check_active_limit(active)?;
            }
            match requested_slot {
                Some(new_slot_id) => {
                    move_into_slot(&mut *tx, new_slot_id, current_slot.facility_id, policy, now)
                        .await?;
                    slot_id = new_slot_id;
                }
                None => {
                    if current_slot.start_time <= now {
                        return Err(CourtError::Validation(
                            "Cannot reactivate a reservation whose time slot has passed"
                                .to_string(),
                        ));
                    }
                    claim_slot(&mut *tx, current_slot.id).await?;
                }
            }
        }
        (true, true) => {
            if let Some(new_slot_id) = requested_slot {
                move_into_slot(&mut *tx, new_slot_id, current_slot.facility_id, policy, now)
                    .await?;
                release_slot(&mut *tx, current_slot.id).await?;
                slot_id = new_slot_id;
            }
        }
        (false, false) => {
            if requested_slot.is_some() {
                return Err(CourtError::Validation(
                    "A cancelled reservation must be reactivated to change its time slot"
                        .to_string(),
                ));
            }
        }
    }

    sqlx::query(
        r#"
        UPDATE reservations SET
            status = $2,
            time_slot_id = $3,
            cancellation_reason = CASE
                WHEN $2 = 'cancelled' THEN COALESCE($4, cancellation_reason)
                ELSE NULL
            END,
            notes = COALESCE($5, notes),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(next.as_str())
    .bind(slot_id)
    .bind(req.cancellation_reason.as_deref())
    .bind(req.notes.as_deref())
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    let reservation = get_reservation_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Reservation", id))?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        "Reservation {} updated by {}: {} -> {}",
        id,
        actor.user_id,
        current,
        next
    );
    Ok(reservation)
}

/// Books on behalf of a customer identified by id or email.
///
/// Skips the active-reservation limit and the lead-time window. When the
/// email is unknown a USER account is created with `new_user_password_hash`.
pub async fn manual_reservation(
    pool: &Pool<Postgres>,
    staff: Actor,
    req: &ManualReservationRequest,
    new_user_password_hash: Option<&str>,
    policy: &BookingPolicy,
    now: DateTime<Utc>,
) -> CourtResult<Reservation> {
    if !staff.is_staff() {
        return Err(CourtError::Authorization(
            "Only staff can create manual reservations".to_string(),
        ));
    }
    let status = req.status.unwrap_or(ReservationStatus::Confirmed);
    if !status.is_active() {
        return Err(CourtError::Validation(
            "Manual reservations must be pending or confirmed".to_string(),
        ));
    }

    let mut tx = pool.begin().await.map_err(db_error)?;

    let user_id = resolve_customer(&mut *tx, req, new_user_password_hash).await?;

    let slot = get_time_slot_by_id(&mut *tx, req.time_slot_id)
        .await?
        .ok_or_else(|| CourtError::not_found("Time slot", req.time_slot_id))?;
    policy.check_slot_bookable(&slot, req.facility_id, now)?;

    check_facility_open(lock_facility_status(&mut *tx, req.facility_id).await?)?;

    let activity = get_activity_by_id(&mut *tx, req.activity_id)
        .await?
        .ok_or_else(|| CourtError::not_found("Activity", req.activity_id))?;
    let linked = is_linked(&mut *tx, req.facility_id, req.activity_id).await?;
    check_activity_bookable(activity.is_active, linked)?;

    claim_slot(&mut *tx, slot.id).await?;
    let id = insert_reservation(
        &mut *tx,
        &NewReservation {
            user_id,
            activity_id: activity.id,
            time_slot_id: slot.id,
            status,
            total_price: activity.price,
            notes: req.notes.as_deref(),
        },
    )
    .await?;

    let reservation = get_reservation_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("Reservation", id))?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        "Manual reservation {} created by {} for user {}",
        id,
        staff.user_id,
        user_id
    );
    Ok(reservation)
}

/// Removes the reservation and frees its slot if it still held it.
pub async fn delete_reservation(pool: &Pool<Postgres>, id: Uuid) -> CourtResult<()> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let row = lock_reservation(&mut *tx, id).await?;
    let status: ReservationStatus = row.status.parse()?;
    if status.is_active() {
        lock_time_slot(&mut *tx, row.time_slot_id).await?;
        release_slot(&mut *tx, row.time_slot_id).await?;
    }

    sqlx::query("DELETE FROM reservations WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;
    tracing::info!("Reservation {} deleted", id);
    Ok(())
}

async fn lock_reservation(conn: &mut PgConnection, id: Uuid) -> CourtResult<DbReservationRow> {
    sqlx::query_as::<_, DbReservationRow>(
        r#"
        SELECT id, user_id, activity_id, time_slot_id, status
        FROM reservations
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error)?
    .ok_or_else(|| CourtError::not_found("Reservation", id))
}

async fn lock_user(conn: &mut PgConnection, id: Uuid) -> CourtResult<()> {
    let is_active = sqlx::query_scalar::<_, bool>(
        "SELECT is_active FROM users WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error)?
    .ok_or_else(|| CourtError::not_found("User", id))?;

    if !is_active {
        return Err(CourtError::Validation(
            "This user account is disabled".to_string(),
        ));
    }
    Ok(())
}

/// Owners may cancel, rebook and revert to pending. Confirming and notes are
/// staff only, as is touching someone else's reservation.
fn authorize_update(
    actor: &Actor,
    row: &DbReservationRow,
    req: &UpdateReservationRequest,
) -> CourtResult<()> {
    if actor.is_staff() {
        return Ok(());
    }
    if row.user_id != actor.user_id {
        return Err(CourtError::Authorization(
            "You can only modify your own reservations".to_string(),
        ));
    }
    if req.status == Some(ReservationStatus::Confirmed) {
        return Err(CourtError::Authorization(
            "Only staff can confirm reservations".to_string(),
        ));
    }
    if req.notes.is_some() {
        return Err(CourtError::Authorization(
            "Only staff can edit reservation notes".to_string(),
        ));
    }
    Ok(())
}

async fn move_into_slot(
    conn: &mut PgConnection,
    slot_id: Uuid,
    facility_id: Uuid,
    policy: &BookingPolicy,
    now: DateTime<Utc>,
) -> CourtResult<()> {
    let slot = lock_time_slot(&mut *conn, slot_id).await?;
    policy.check_slot_bookable(&slot, facility_id, now)?;
    policy.check_lead_time(slot.start_time, now)?;
    claim_slot(conn, slot_id).await?;
    Ok(())
}

async fn resolve_customer(
    conn: &mut PgConnection,
    req: &ManualReservationRequest,
    new_user_password_hash: Option<&str>,
) -> CourtResult<Uuid> {
    if let Some(user_id) = req.user_id {
        let user = get_user_by_id(&mut *conn, user_id)
            .await?
            .ok_or_else(|| CourtError::not_found("User", user_id))?;
        if !user.is_active {
            return Err(CourtError::Validation(
                "This user account is disabled".to_string(),
            ));
        }
        return Ok(user.id);
    }

    let email = req.email.as_deref().ok_or_else(|| {
        CourtError::Validation("Either a user id or an email is required".to_string())
    })?;

    if let Some(existing) = get_user_by_email(&mut *conn, email).await? {
        if !existing.is_active {
            return Err(CourtError::Validation(
                "This user account is disabled".to_string(),
            ));
        }
        return Ok(existing.id);
    }

    let name = req.name.as_deref().ok_or_else(|| {
        CourtError::Validation("A name is required to create a new user".to_string())
    })?;
    let password_hash = new_user_password_hash.ok_or_else(|| {
        CourtError::Internal("missing password hash for new user".into())
    })?;

    let user = insert_user(
        &mut *conn,
        &NewUser {
            name,
            email,
            password_hash,
            phone: req.phone.as_deref(),
            role: Role::User,
        },
    )
    .await?;

    tracing::info!("Created user {} during manual reservation", user.id);
    Ok(user.id)
}
