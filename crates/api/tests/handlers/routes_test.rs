use axum::http::StatusCode;
use courtside_core::models::{settings::SystemSettings, user::Role};
use courtside_db::mock::repositories::MockSettingsStore;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{bearer, default_settings_store, test_server};

#[tokio::test]
async fn test_health_and_version() {
    let server = test_server(MockSettingsStore::new());

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<serde_json::Value>()["status"], "ok");

    server.get("/version").await.assert_status_ok();
}

#[tokio::test]
async fn test_public_settings_need_no_session() {
    let server = test_server(default_settings_store());

    let response = server.get("/api/settings/public").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(
        body["maxBookingLeadDays"],
        SystemSettings::DEFAULT_MAX_BOOKING_LEAD_DAYS
    );
    assert_eq!(body["cancellationDeadlineHours"], 24);
    assert!(body.get("updatedAt").is_none());
}

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let server = test_server(MockSettingsStore::new());

    for path in ["/api/reservations", "/api/auth/session", "/api/users", "/api/shifts"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{}", path);
    }
}

#[tokio::test]
async fn test_role_checks() {
    let server = test_server(MockSettingsStore::new());

    let (name, value) = bearer(Role::User);
    server
        .get("/api/users")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .get("/api/employees")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (name, value) = bearer(Role::Employee);
    server
        .get("/api/settings")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_facility_payload_is_validated() {
    let server = test_server(MockSettingsStore::new());
    let (name, value) = bearer(Role::Admin);

    let response = server
        .post("/api/facilities")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "name": "Court 1",
            "capacity": 0,
            "openingHour": 8,
            "closingHour": 22,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["details"]["capacity"].is_array());

    let response = server
        .post("/api/facilities")
        .add_header(name, value)
        .json(&json!({
            "name": "Court 1",
            "capacity": 4,
            "openingHour": 20,
            "closingHour": 10,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Validation error: Closing hour must be after opening hour"
    );
}

#[tokio::test]
async fn test_settings_patch_is_validated() {
    let server = test_server(MockSettingsStore::new());
    let (name, value) = bearer(Role::Admin);

    server
        .patch("/api/settings")
        .add_header(name, value)
        .json(&json!({ "maxBookingLeadDays": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_manual_reservation_is_staff_only() {
    let server = test_server(MockSettingsStore::new());
    let (name, value) = bearer(Role::User);

    server
        .post("/api/reservations/manual")
        .add_header(name, value)
        .json(&json!({
            "email": "walk-in@example.com",
            "facilityId": uuid::Uuid::new_v4(),
            "activityId": uuid::Uuid::new_v4(),
            "timeSlotId": uuid::Uuid::new_v4(),
        }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
