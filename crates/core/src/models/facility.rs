use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{CourtError, CourtResult},
    models::time_slot::TimeSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FacilityStatus {
    Active,
    Maintenance,
    Closed,
}

impl FacilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityStatus::Active => "ACTIVE",
            FacilityStatus::Maintenance => "MAINTENANCE",
            FacilityStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityStatus {
    type Err = CourtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(FacilityStatus::Active),
            "MAINTENANCE" => Ok(FacilityStatus::Maintenance),
            "CLOSED" => Ok(FacilityStatus::Closed),
            other => Err(CourtError::Validation(format!(
                "Unknown facility status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub capacity: i32,
    pub opening_hour: i32,
    pub closing_hour: i32,
    pub status: FacilityStatus,
    pub activity_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operating hours are whole hours; a facility may close at 24 (midnight).
pub fn validate_operating_hours(opening_hour: i32, closing_hour: i32) -> CourtResult<()> {
    if !(0..=23).contains(&opening_hour) || !(1..=24).contains(&closing_hour) {
        return Err(CourtError::Validation(
            "Operating hours must be between 0 and 24".to_string(),
        ));
    }
    if closing_hour <= opening_hour {
        return Err(CourtError::Validation(
            "Closing hour must be after opening hour".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityRequest {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 1, max = 10000, message = "capacity must be between 1 and 10000"))]
    pub capacity: i32,
    #[validate(range(min = 0, max = 23, message = "opening hour must be between 0 and 23"))]
    pub opening_hour: i32,
    #[validate(range(min = 1, max = 24, message = "closing hour must be between 1 and 24"))]
    pub closing_hour: i32,
    pub status: Option<FacilityStatus>,
    #[serde(default)]
    pub activity_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacilityRequest {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 1, max = 10000, message = "capacity must be between 1 and 10000"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0, max = 23, message = "opening hour must be between 0 and 23"))]
    pub opening_hour: Option<i32>,
    #[validate(range(min = 1, max = 24, message = "closing hour must be between 1 and 24"))]
    pub closing_hour: Option<i32>,
    pub status: Option<FacilityStatus>,
    /// Replaces the linked activities when present.
    pub activity_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityListQuery {
    pub status: Option<FacilityStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityAvailability {
    pub facility_id: Uuid,
    pub facility_name: String,
    pub opening_hour: i32,
    pub closing_hour: i32,
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlotsResponse {
    pub facility_id: Uuid,
    pub deleted: u64,
    pub created: u64,
}
