#![allow(dead_code)]

use chrono::{DateTime, Duration, DurationRound, Utc};
use chrono_tz::Tz;
use courtside_core::{
    booking::BookingPolicy,
    models::{
        activity::{Activity, CreateActivityRequest},
        facility::{CreateFacilityRequest, Facility},
        settings::SystemSettings,
        time_slot::TimeSlot,
        user::{Role, User},
    },
};
use courtside_db::{
    repositories::{activity, facility, time_slot, user},
    DbPool,
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Connects to `TEST_DATABASE_URL`, or returns `None` so the caller can skip.
pub async fn test_pool() -> Option<DbPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    courtside_db::schema::initialize_database(&pool)
        .await
        .expect("Failed to initialize test database schema");

    Some(pool)
}

pub fn policy() -> BookingPolicy {
    let settings = SystemSettings {
        max_booking_lead_days: 7,
        cancellation_deadline_hours: 24,
        max_active_reservations_per_user: 3,
        ..SystemSettings::default()
    };
    BookingPolicy::new(&settings, Tz::UTC)
}

/// The current instant truncated to the hour.
pub fn this_hour() -> DateTime<Utc> {
    Utc::now()
        .duration_trunc(Duration::hours(1))
        .expect("hour truncation")
}

pub async fn customer(pool: &DbPool) -> User {
    let email = format!("customer-{}@example.com", Uuid::new_v4());
    user::create_user(
        pool,
        &user::NewUser {
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

/// An ACTIVE facility with one linked activity priced at 1500 cents.
pub async fn facility_with_activity(pool: &DbPool) -> (Facility, Activity) {
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

    (facility, activity)
}

pub async fn slot_at(pool: &DbPool, facility_id: Uuid, start: DateTime<Utc>) -> TimeSlot {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO time_slots (id, facility_id, start_time, end_time, is_available, created_at)
        VALUES ($1, $2, $3, $4, TRUE, NOW())
        "#,
    )
    .bind(id)
    .bind(facility_id)
    .bind(start)
    .bind(start + Duration::hours(1))
    .execute(pool)
    .await
    .expect("insert slot");

    time_slot::get_time_slot_by_id(pool, id)
        .await
        .expect("fetch slot")
        .expect("slot exists")
}

pub async fn reservation_count(pool: &DbPool, slot_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reservations WHERE time_slot_id = $1")
        .bind(slot_id)
        .fetch_one(pool)
        .await
        .expect("count reservations")
}
