use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Global booking policy, stored as a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub max_booking_lead_days: i32,
    pub cancellation_deadline_hours: i32,
    pub max_active_reservations_per_user: i32,
    pub default_opening_hour: i32,
    pub default_closing_hour: i32,
    pub updated_at: DateTime<Utc>,
}

impl SystemSettings {
    pub const DEFAULT_MAX_BOOKING_LEAD_DAYS: i32 = 7;
    pub const DEFAULT_CANCELLATION_DEADLINE_HOURS: i32 = 24;
    pub const DEFAULT_MAX_ACTIVE_RESERVATIONS: i32 = 3;
    pub const DEFAULT_OPENING_HOUR: i32 = 8;
    pub const DEFAULT_CLOSING_HOUR: i32 = 22;

    pub fn public(&self) -> PublicSettings {
        PublicSettings {
            max_booking_lead_days: self.max_booking_lead_days,
            cancellation_deadline_hours: self.cancellation_deadline_hours,
            max_active_reservations_per_user: self.max_active_reservations_per_user,
            default_opening_hour: self.default_opening_hour,
            default_closing_hour: self.default_closing_hour,
        }
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            max_booking_lead_days: Self::DEFAULT_MAX_BOOKING_LEAD_DAYS,
            cancellation_deadline_hours: Self::DEFAULT_CANCELLATION_DEADLINE_HOURS,
            max_active_reservations_per_user: Self::DEFAULT_MAX_ACTIVE_RESERVATIONS,
            default_opening_hour: Self::DEFAULT_OPENING_HOUR,
            default_closing_hour: Self::DEFAULT_CLOSING_HOUR,
            updated_at: Utc::now(),
        }
    }
}

/// The part of the policy customers are allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub max_booking_lead_days: i32,
    pub cancellation_deadline_hours: i32,
    pub max_active_reservations_per_user: i32,
    pub default_opening_hour: i32,
    pub default_closing_hour: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 1, max = 365, message = "max booking lead days must be between 1 and 365"))]
    pub max_booking_lead_days: Option<i32>,
    #[validate(range(min = 0, max = 168, message = "cancellation deadline must be between 0 and 168 hours"))]
    pub cancellation_deadline_hours: Option<i32>,
    #[validate(range(min = 1, max = 100, message = "max active reservations must be between 1 and 100"))]
    pub max_active_reservations_per_user: Option<i32>,
    #[validate(range(min = 0, max = 23, message = "default opening hour must be between 0 and 23"))]
    pub default_opening_hour: Option<i32>,
    #[validate(range(min = 1, max = 24, message = "default closing hour must be between 1 and 24"))]
    pub default_closing_hour: Option<i32>,
}

impl UpdateSettingsRequest {
    /// Overlays the requested changes on the current settings.
    pub fn apply_to(&self, current: &SystemSettings) -> SystemSettings {
        SystemSettings {
            max_booking_lead_days: self
                .max_booking_lead_days
                .unwrap_or(current.max_booking_lead_days),
            cancellation_deadline_hours: self
                .cancellation_deadline_hours
                .unwrap_or(current.cancellation_deadline_hours),
            max_active_reservations_per_user: self
                .max_active_reservations_per_user
                .unwrap_or(current.max_active_reservations_per_user),
            default_opening_hour: self
                .default_opening_hour
                .unwrap_or(current.default_opening_hour),
            default_closing_hour: self
                .default_closing_hour
                .unwrap_or(current.default_closing_hour),
            updated_at: current.updated_at,
        }
    }
}
