use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::CourtError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 3] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and confirmed reservations hold their slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Cancelled, Confirmed)
                | (Cancelled, Pending)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = CourtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(CourtError::Validation(format!(
                "Unknown reservation status: {}",
                other
            ))),
        }
    }
}

/// A reservation joined with the slot, facility and activity it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub activity_id: Uuid,
    pub activity_name: String,
    pub time_slot_id: Uuid,
    pub facility_id: Uuid,
    pub facility_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    /// Activity price in cents at booking time.
    pub total_price: i64,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub facility_id: Uuid,
    pub activity_id: Uuid,
    pub time_slot_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub status: Option<ReservationStatus>,
    pub time_slot_id: Option<Uuid>,
    #[validate(length(max = 500, message = "cancellation reason must be at most 500 characters"))]
    pub cancellation_reason: Option<String>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl UpdateReservationRequest {
    pub fn cancel(reason: Option<String>) -> Self {
        Self {
            status: Some(ReservationStatus::Cancelled),
            cancellation_reason: reason,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.time_slot_id.is_none()
            && self.cancellation_reason.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    #[validate(length(max = 500, message = "cancellation reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// Booking made by staff for a customer identified by id or email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManualReservationRequest {
    pub user_id: Option<Uuid>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    /// Required when the email does not belong to an existing user.
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 32, message = "phone must be at most 32 characters"))]
    pub phone: Option<String>,
    pub facility_id: Uuid,
    pub activity_id: Uuid,
    pub time_slot_id: Uuid,
    pub status: Option<ReservationStatus>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    pub status: Option<ReservationStatus>,
    pub facility_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}
