use courtside_core::{
    models::{report::ReportType, reservation::ReservationStatus},
    reporting::{
        build_report, occupancy_by_facility, reservations_by_facility, reservations_by_status,
        revenue_by_activity, ReservationFact, SlotFact,
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

struct Fixture {
    court: Uuid,
    pool: Uuid,
    tennis: Uuid,
    swim: Uuid,
}

impl Fixture {
    fn new() -> Self {
        Self {
            court: Uuid::new_v4(),
            pool: Uuid::new_v4(),
            tennis: Uuid::new_v4(),
            swim: Uuid::new_v4(),
        }
    }

    fn fact(&self, at_pool: bool, status: ReservationStatus, price: i64) -> ReservationFact {
        let (facility_id, facility_name, activity_id, activity_name) = if at_pool {
            (self.pool, "Pool", self.swim, "Swimming")
        } else {
            (self.court, "Court 1", self.tennis, "Tennis")
        };
        ReservationFact {
            facility_id,
            facility_name: facility_name.to_string(),
            activity_id,
            activity_name: activity_name.to_string(),
            status,
            total_price: price,
        }
    }

    fn facts(&self) -> Vec<ReservationFact> {
        vec![
            self.fact(false, ReservationStatus::Confirmed, 2000),
            self.fact(false, ReservationStatus::Pending, 2000),
            self.fact(false, ReservationStatus::Cancelled, 2000),
            self.fact(true, ReservationStatus::Confirmed, 1500),
        ]
    }
}

#[test]
fn test_reservations_by_facility() {
    let fx = Fixture::new();
    let rows = reservations_by_facility(&fx.facts());

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].facility_name, "Court 1");
    assert_eq!((rows[0].total, rows[0].active, rows[0].cancelled), (3, 2, 1));
    assert_eq!((rows[1].total, rows[1].active, rows[1].cancelled), (1, 1, 0));
}

#[test]
fn test_reservations_by_status_lists_every_status() {
    let fx = Fixture::new();
    let rows = reservations_by_status(&fx.facts()[..1]);

    assert_eq!(rows.len(), 3);
    let counts: Vec<u64> = rows.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![0, 1, 0]);
}

#[test]
fn test_revenue_ignores_cancelled() {
    let fx = Fixture::new();
    let rows = revenue_by_activity(&fx.facts());

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].activity_name, "Tennis");
    assert_eq!(rows[0].reservations, 2);
    assert_eq!(rows[0].revenue, 4000);
    assert_eq!(rows[1].revenue, 1500);
}

#[test]
fn test_occupancy() {
    let facility_id = Uuid::new_v4();
    let slots: Vec<SlotFact> = [false, true, true, true]
        .into_iter()
        .map(|is_available| SlotFact {
            facility_id,
            facility_name: "Court 1".to_string(),
            is_available,
        })
        .collect();

    let rows = occupancy_by_facility(&slots);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_slots, 4);
    assert_eq!(rows[0].booked_slots, 1);
    assert!((rows[0].occupancy_rate - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_build_report_payloads() {
    let fx = Fixture::new();
    let revenue = build_report(ReportType::RevenueByActivity, &fx.facts(), &[]);
    assert_eq!(revenue["totalRevenue"], json!(5500));

    let by_status = build_report(ReportType::ReservationsByStatus, &fx.facts(), &[]);
    assert_eq!(by_status["totalReservations"], json!(4));
    assert_eq!(by_status["rows"][2]["status"], json!("cancelled"));

    let empty = build_report(ReportType::OccupancyByFacility, &[], &[]);
    assert_eq!(empty, json!({ "totalSlots": 0, "rows": [] }));
}
