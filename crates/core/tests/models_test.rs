use chrono::Utc;
use courtside_core::models::{
    facility::{validate_operating_hours, CreateFacilityRequest, FacilityStatus},
    report::{GenerateReportRequest, ReportType},
    reservation::{ReservationStatus, UpdateReservationRequest},
    settings::{SystemSettings, UpdateSettingsRequest},
    shift::{validate_shift_window, ShiftType},
    user::{RegisterRequest, Role},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_value};
use validator::Validate;

#[rstest]
#[case(Role::Admin, "\"ADMIN\"")]
#[case(Role::Employee, "\"EMPLOYEE\"")]
#[case(Role::User, "\"USER\"")]
fn test_role_wire_format(#[case] role: Role, #[case] wire: &str) {
    assert_eq!(serde_json::to_string(&role).unwrap(), wire);
    assert_eq!(from_str::<Role>(wire).unwrap(), role);
    assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
}

#[test]
fn test_role_staff() {
    assert!(Role::Admin.is_staff());
    assert!(Role::Employee.is_staff());
    assert!(!Role::User.is_staff());
    assert!("janitor".parse::<Role>().is_err());
}

#[rstest]
#[case(ReservationStatus::Pending, ReservationStatus::Confirmed, true)]
#[case(ReservationStatus::Pending, ReservationStatus::Cancelled, true)]
#[case(ReservationStatus::Confirmed, ReservationStatus::Cancelled, true)]
#[case(ReservationStatus::Cancelled, ReservationStatus::Confirmed, true)]
#[case(ReservationStatus::Cancelled, ReservationStatus::Pending, true)]
#[case(ReservationStatus::Confirmed, ReservationStatus::Pending, false)]
#[case(ReservationStatus::Pending, ReservationStatus::Pending, false)]
fn test_reservation_transitions(
    #[case] from: ReservationStatus,
    #[case] to: ReservationStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[test]
fn test_reservation_status_strings() {
    for status in ReservationStatus::ALL {
        assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
    }
    assert!(ReservationStatus::Confirmed.is_active());
    assert!(!ReservationStatus::Cancelled.is_active());
}

#[test]
fn test_cancel_request_shape() {
    let request = UpdateReservationRequest::cancel(Some("rain".to_string()));
    assert_eq!(request.status, Some(ReservationStatus::Cancelled));
    assert_eq!(request.cancellation_reason.as_deref(), Some("rain"));
    assert!(!request.is_empty());
    assert!(UpdateReservationRequest::default().is_empty());
}

#[test]
fn test_update_request_uses_camel_case() {
    let slot_id = uuid::Uuid::new_v4();
    let request: UpdateReservationRequest = serde_json::from_value(json!({
        "status": "cancelled",
        "timeSlotId": slot_id,
        "cancellationReason": "sick",
    }))
    .unwrap();

    assert_eq!(request.time_slot_id, Some(slot_id));
    assert_eq!(request.status, Some(ReservationStatus::Cancelled));
}

#[rstest]
#[case(8, 10, true)]
#[case(0, 24, true)]
#[case(10, 10, false)]
#[case(12, 8, false)]
#[case(-1, 8, false)]
#[case(8, 25, false)]
fn test_operating_hours(#[case] open: i32, #[case] close: i32, #[case] valid: bool) {
    assert_eq!(validate_operating_hours(open, close).is_ok(), valid);
}

#[test]
fn test_create_facility_validation() {
    let request = CreateFacilityRequest {
        name: "X".to_string(),
        description: None,
        location: None,
        capacity: 0,
        opening_hour: 25,
        closing_hour: 10,
        status: Some(FacilityStatus::Active),
        activity_ids: vec![],
    };
    let errors = request.validate().unwrap_err();
    let fields = errors.field_errors();

    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("capacity"));
    assert!(fields.contains_key("opening_hour"));
}

#[test]
fn test_register_validation() {
    let request = RegisterRequest {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "short".to_string(),
        phone: None,
    };
    let errors = request.validate().unwrap_err();
    assert_eq!(errors.field_errors().len(), 1);
    assert!(errors.field_errors().contains_key("password"));
}

#[test]
fn test_settings_overlay() {
    let current = SystemSettings::default();
    let request = UpdateSettingsRequest {
        max_booking_lead_days: Some(14),
        ..Default::default()
    };

    let updated = request.apply_to(&current);
    assert_eq!(updated.max_booking_lead_days, 14);
    assert_eq!(
        updated.cancellation_deadline_hours,
        current.cancellation_deadline_hours
    );

    let public = to_value(updated.public()).unwrap();
    assert_eq!(public["maxBookingLeadDays"], json!(14));
    assert!(public.get("updatedAt").is_none());
}

#[test]
fn test_settings_ranges() {
    let request = UpdateSettingsRequest {
        max_active_reservations_per_user: Some(0),
        cancellation_deadline_hours: Some(500),
        ..Default::default()
    };
    let errors = request.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("max_active_reservations_per_user"));
    assert!(errors.field_errors().contains_key("cancellation_deadline_hours"));
}

#[test]
fn test_shift_type_and_window() {
    assert_eq!(serde_json::to_string(&ShiftType::FullDay).unwrap(), "\"FULL_DAY\"");
    assert_eq!("full_day".parse::<ShiftType>().unwrap(), ShiftType::FullDay);

    let start = Utc::now();
    assert!(validate_shift_window(start, start + chrono::Duration::hours(8)).is_ok());
    assert!(validate_shift_window(start, start).is_err());
}

#[test]
fn test_report_period() {
    let today = Utc::now().date_naive();
    let request = GenerateReportRequest {
        report_type: ReportType::RevenueByActivity,
        from: Some(today),
        to: Some(today),
    };
    assert!(request.validate_period().is_err());

    let open_ended = GenerateReportRequest {
        report_type: ReportType::RevenueByActivity,
        from: Some(today),
        to: None,
    };
    assert!(open_ended.validate_period().is_ok());
    assert_eq!(
        "occupancy_by_facility".parse::<ReportType>().unwrap(),
        ReportType::OccupancyByFacility
    );
}
