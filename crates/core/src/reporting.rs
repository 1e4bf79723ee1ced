//! Report aggregation: plain group-bys over rows fetched by the db crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{report::ReportType, reservation::ReservationStatus};

/// One reservation flattened for aggregation.
#[derive(Debug, Clone)]
pub struct ReservationFact {
    pub facility_id: Uuid,
    pub facility_name: String,
    pub activity_id: Uuid,
    pub activity_name: String,
    pub status: ReservationStatus,
    pub total_price: i64,
}

/// One time slot flattened for occupancy figures.
#[derive(Debug, Clone)]
pub struct SlotFact {
    pub facility_id: Uuid,
    pub facility_name: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityCount {
    pub facility_id: Uuid,
    pub facility_name: String,
    pub total: u64,
    pub active: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: ReservationStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRevenue {
    pub activity_id: Uuid,
    pub activity_name: String,
    pub reservations: u64,
    /// Cents.
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityOccupancy {
    pub facility_id: Uuid,
    pub facility_name: String,
    pub total_slots: u64,
    pub booked_slots: u64,
    pub occupancy_rate: f64,
}

/// Sorted by total descending, then by name.
pub fn reservations_by_facility(facts: &[ReservationFact]) -> Vec<FacilityCount> {
    let mut groups: BTreeMap<Uuid, FacilityCount> = BTreeMap::new();
    for fact in facts {
        let entry = groups.entry(fact.facility_id).or_insert_with(|| FacilityCount {
            facility_id: fact.facility_id,
            facility_name: fact.facility_name.clone(),
            total: 0,
            active: 0,
            cancelled: 0,
        });
        entry.total += 1;
        if fact.status.is_active() {
            entry.active += 1;
        } else {
            entry.cancelled += 1;
        }
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.facility_name.cmp(&b.facility_name))
    });
    rows
}

/// Every status is listed, including those with a zero count.
pub fn reservations_by_status(facts: &[ReservationFact]) -> Vec<StatusCount> {
    ReservationStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: facts.iter().filter(|f| f.status == *status).count() as u64,
        })
        .collect()
}

/// Cancelled reservations earn nothing and are left out.
pub fn revenue_by_activity(facts: &[ReservationFact]) -> Vec<ActivityRevenue> {
    let mut groups: BTreeMap<Uuid, ActivityRevenue> = BTreeMap::new();
    for fact in facts.iter().filter(|f| f.status.is_active()) {
        let entry = groups.entry(fact.activity_id).or_insert_with(|| ActivityRevenue {
            activity_id: fact.activity_id,
            activity_name: fact.activity_name.clone(),
            reservations: 0,
            revenue: 0,
        });
        entry.reservations += 1;
        entry.revenue += fact.total_price;
    }

    let mut rows: Vec<_> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.activity_name.cmp(&b.activity_name))
    });
    rows
}

pub fn occupancy_by_facility(slots: &[SlotFact]) -> Vec<FacilityOccupancy> {
    let mut groups: BTreeMap<Uuid, FacilityOccupancy> = BTreeMap::new();
    for slot in slots {
        let entry = groups.entry(slot.facility_id).or_insert_with(|| FacilityOccupancy {
            facility_id: slot.facility_id,
            facility_name: slot.facility_name.clone(),
            total_slots: 0,
            booked_slots: 0,
            occupancy_rate: 0.0,
        });
        entry.total_slots += 1;
        if !slot.is_available {
            entry.booked_slots += 1;
        }
    }

    let mut rows: Vec<_> = groups
        .into_values()
        .map(|mut row| {
            row.occupancy_rate = row.booked_slots as f64 / row.total_slots as f64;
            row
        })
        .collect();
    rows.sort_by(|a, b| a.facility_name.cmp(&b.facility_name));
    rows
}

/// Builds the JSON payload stored for a report of the given type.
pub fn build_report(
    report_type: ReportType,
    reservations: &[ReservationFact],
    slots: &[SlotFact],
) -> serde_json::Value {
    match report_type {
        ReportType::ReservationsByFacility => serde_json::json!({
            "totalReservations": reservations.len(),
            "rows": reservations_by_facility(reservations),
        }),
        ReportType::ReservationsByStatus => serde_json::json!({
            "totalReservations": reservations.len(),
            "rows": reservations_by_status(reservations),
        }),
        ReportType::RevenueByActivity => {
            let rows = revenue_by_activity(reservations);
            let total: i64 = rows.iter().map(|r| r.revenue).sum();
            serde_json::json!({
                "totalRevenue": total,
                "rows": rows,
            })
        }
        ReportType::OccupancyByFacility => serde_json::json!({
            "totalSlots": slots.len(),
            "rows": occupancy_by_facility(slots),
        }),
    }
}
