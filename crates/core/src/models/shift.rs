use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{CourtError, CourtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Evening,
    FullDay,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Morning => "MORNING",
            ShiftType::Afternoon => "AFTERNOON",
            ShiftType::Evening => "EVENING",
            ShiftType::FullDay => "FULL_DAY",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftType {
    type Err = CourtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MORNING" => Ok(ShiftType::Morning),
            "AFTERNOON" => Ok(ShiftType::Afternoon),
            "EVENING" => Ok(ShiftType::Evening),
            "FULL_DAY" => Ok(ShiftType::FullDay),
            other => Err(CourtError::Validation(format!("Unknown shift type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeShift {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub shift_type: ShiftType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub fn validate_shift_window(start: DateTime<Utc>, end: DateTime<Utc>) -> CourtResult<()> {
    if end <= start {
        return Err(CourtError::Validation(
            "Shift must end after it starts".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub employee_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub shift_type: ShiftType,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub shift_type: Option<ShiftType>,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftListQuery {
    pub employee_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
