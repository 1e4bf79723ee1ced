//! Booking policy: the rules a reservation has to satisfy before the db crate
//! is allowed to claim a slot.
//!
//! Every check takes the current instant as an argument so the same rules run
//! identically in request handlers, inside transactions, and in tests.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::{
    errors::{CourtError, CourtResult},
    models::{
        facility::FacilityStatus, reservation::ReservationStatus, settings::SystemSettings,
        time_slot::TimeSlot, user::Role,
    },
};

/// Who is acting on a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    pub max_booking_lead_days: i32,
    pub cancellation_deadline_hours: i32,
    pub max_active_reservations_per_user: i32,
    /// Zone in which "today" and slot dates are evaluated.
    pub timezone: Tz,
}

impl BookingPolicy {
    pub fn new(settings: &SystemSettings, timezone: Tz) -> Self {
        Self {
            max_booking_lead_days: settings.max_booking_lead_days,
            cancellation_deadline_hours: settings.cancellation_deadline_hours,
            max_active_reservations_per_user: settings.max_active_reservations_per_user,
            timezone,
        }
    }

    /// `active_count` counts pending and confirmed reservations that have not started yet.
    pub fn check_active_limit(&self, active_count: i64) -> CourtResult<()> {
        if active_count >= i64::from(self.max_active_reservations_per_user) {
            return Err(CourtError::Validation(format!(
                "You already have the maximum of {} active reservations",
                self.max_active_reservations_per_user
            )));
        }
        Ok(())
    }

    pub fn check_slot_bookable(
        &self,
        slot: &TimeSlot,
        facility_id: Uuid,
        now: DateTime<Utc>,
    ) -> CourtResult<()> {
        if slot.facility_id != facility_id {
            return Err(CourtError::Validation(
                "Time slot does not belong to this facility".to_string(),
            ));
        }
        if !slot.is_available {
            return Err(CourtError::Conflict(
                "Time slot is no longer available".to_string(),
            ));
        }
        if slot.start_time <= now {
            return Err(CourtError::Validation(
                "Cannot book a time slot in the past".to_string(),
            ));
        }
        Ok(())
    }

    /// Last local date on which a slot may start.
    pub fn latest_bookable_date(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = self.local_date(now);
        let lead = u64::try_from(self.max_booking_lead_days.max(0)).unwrap_or(0);
        today.checked_add_days(Days::new(lead)).unwrap_or(NaiveDate::MAX)
    }

    pub fn check_lead_time(
        &self,
        start_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> CourtResult<()> {
        if self.local_date(start_time) > self.latest_bookable_date(now) {
            return Err(CourtError::Validation(format!(
                "Reservations can only be made up to {} days in advance",
                self.max_booking_lead_days
            )));
        }
        Ok(())
    }

    pub fn check_cancellation_deadline(
        &self,
        start_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> CourtResult<()> {
        let deadline = Duration::hours(i64::from(self.cancellation_deadline_hours));
        if start_time - now < deadline {
            return Err(CourtError::Validation(format!(
                "Reservations can only be cancelled at least {} hours before the start time",
                self.cancellation_deadline_hours
            )));
        }
        Ok(())
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }
}

pub fn check_facility_open(status: FacilityStatus) -> CourtResult<()> {
    if status != FacilityStatus::Active {
        return Err(CourtError::Validation(format!(
            "Facility is not accepting reservations (status: {})",
            status
        )));
    }
    Ok(())
}

/// The activity must be bookable and offered at the facility.
pub fn check_activity_bookable(activity_active: bool, linked_to_facility: bool) -> CourtResult<()> {
    if !activity_active {
        return Err(CourtError::Validation(
            "This activity is not currently available".to_string(),
        ));
    }
    if !linked_to_facility {
        return Err(CourtError::Validation(
            "This activity is not offered at the selected facility".to_string(),
        ));
    }
    Ok(())
}

pub fn check_status_transition(
    current: ReservationStatus,
    next: ReservationStatus,
) -> CourtResult<()> {
    if current == next || current.can_transition_to(next) {
        return Ok(());
    }
    Err(CourtError::Validation(format!(
        "Cannot change reservation status from {} to {}",
        current,
        next
    )))
}
