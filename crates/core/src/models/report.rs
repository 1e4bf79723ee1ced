use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CourtError, CourtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    ReservationsByFacility,
    ReservationsByStatus,
    RevenueByActivity,
    OccupancyByFacility,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::ReservationsByFacility => "reservations_by_facility",
            ReportType::ReservationsByStatus => "reservations_by_status",
            ReportType::RevenueByActivity => "revenue_by_activity",
            ReportType::OccupancyByFacility => "occupancy_by_facility",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = CourtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reservations_by_facility" => Ok(ReportType::ReservationsByFacility),
            "reservations_by_status" => Ok(ReportType::ReservationsByStatus),
            "revenue_by_activity" => Ok(ReportType::RevenueByActivity),
            "occupancy_by_facility" => Ok(ReportType::OccupancyByFacility),
            other => Err(CourtError::Validation(format!("Unknown report type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub report_type: ReportType,
    pub generated_by: Uuid,
    pub period_from: Option<NaiveDate>,
    pub period_to: Option<NaiveDate>,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: Uuid,
    pub report_type: ReportType,
    pub generated_by: Uuid,
    pub period_from: Option<NaiveDate>,
    pub period_to: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportSummary {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            report_type: report.report_type,
            generated_by: report.generated_by,
            period_from: report.period_from,
            period_to: report.period_to,
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_type: ReportType,
    /// Inclusive start date.
    pub from: Option<NaiveDate>,
    /// Exclusive end date.
    pub to: Option<NaiveDate>,
}

impl GenerateReportRequest {
    pub fn validate_period(&self) -> CourtResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if to <= from {
                return Err(CourtError::Validation(
                    "Report period must end after it starts".to_string(),
                ));
            }
        }
        Ok(())
    }
}
