use std::future::IntoFuture;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, DurationRound, Utc};
use courtside_core::models::{
    activity::CreateActivityRequest,
    facility::CreateFacilityRequest,
    reservation::{Reservation, ReservationStatus},
    user::{Role, User},
};
use courtside_db::repositories::{
    activity, facility,
    user::{self, NewUser},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::test_utils::{bearer_for, db_server, test_db_pool};

async fn customer(pool: &PgPool) -> User {
    let email = format!("customer-{}@example.com", Uuid::new_v4());
    user::create_user(
        pool,
        &NewUser {
            name: "Test Customer",
            email: &email,
            password_hash: "not-a-real-hash",
            phone: None,
            role: Role::User,
        },
        None,
    )
    .await
    .expect("create customer")
}

/// An ACTIVE facility with one linked activity and a free slot two days out.
async fn bookable_slot(pool: &PgPool) -> (Uuid, Uuid, Uuid) {
    let activity = activity::create_activity(
        pool,
        &CreateActivityRequest {
            name: format!("Padel {}", Uuid::new_v4()),
            description: None,
            duration_minutes: 60,
            price: 1500,
            max_participants: 4,
            is_active: Some(true),
            facility_ids: Vec::new(),
        },
    )
    .await
    .expect("create activity");

    let facility = facility::create_facility(
        pool,
        &CreateFacilityRequest {
            name: format!("Court {}", Uuid::new_v4()),
            description: None,
            location: None,
            capacity: 4,
            opening_hour: 8,
            closing_hour: 10,
            status: None,
            activity_ids: vec![activity.id],
        },
    )
    .await
    .expect("create facility");

    let start: DateTime<Utc> = Utc::now()
        .duration_trunc(Duration::hours(1))
        .expect("hour truncation")
        + Duration::days(2);
    let slot_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO time_slots (id, facility_id, start_time, end_time, is_available, created_at)
        VALUES ($1, $2, $3, $4, TRUE, NOW())
        "#,
    )
    .bind(slot_id)
    .bind(facility.id)
    .bind(start)
    .bind(start + Duration::hours(1))
    .execute(pool)
    .await
    .expect("insert slot");

    (facility.id, activity.id, slot_id)
}

#[tokio::test]
async fn test_booking_returns_the_reservation() {
    let Some(pool) = test_db_pool().await else {
        return;
    };
    let user = customer(&pool).await;
    let (facility_id, activity_id, slot_id) = bookable_slot(&pool).await;
    let server = db_server(pool);

    let (name, value) = bearer_for(&user);
    let response = server
        .post("/api/reservations")
        .add_header(name, value)
        .json(&json!({
            "facilityId": facility_id,
            "activityId": activity_id,
            "timeSlotId": slot_id,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let reservation: Reservation = response.json();
    assert_eq!(reservation.user_id, user.id);
    assert_eq!(reservation.time_slot_id, slot_id);
    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.total_price, 1500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_bookings_over_http() {
    let Some(pool) = test_db_pool().await else {
        return;
    };
    let first = customer(&pool).await;
    let second = customer(&pool).await;
    let (facility_id, activity_id, slot_id) = bookable_slot(&pool).await;
    let server = db_server(pool);

    let body = json!({
        "facilityId": facility_id,
        "activityId": activity_id,
        "timeSlotId": slot_id,
    });
    let (first_name, first_value) = bearer_for(&first);
    let (second_name, second_value) = bearer_for(&second);

    let (a, b) = tokio::join!(
        server
            .post("/api/reservations")
            .add_header(first_name, first_value)
            .json(&body)
            .into_future(),
        server
            .post("/api/reservations")
            .add_header(second_name, second_value)
            .json(&body)
            .into_future(),
    );

    let mut statuses = [a.status_code(), b.status_code()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let winner = if a.status_code() == StatusCode::OK { &a } else { &b };
    let reservation: Reservation = winner.json();
    assert_eq!(reservation.time_slot_id, slot_id);

    let loser = if a.status_code() == StatusCode::OK { &b } else { &a };
    let error: serde_json::Value = loser.json();
    assert_eq!(error["error"], "Conflict: Time slot is no longer available");
}
