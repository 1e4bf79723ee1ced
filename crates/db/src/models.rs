use chrono::{DateTime, NaiveDate, Utc};
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::{
        activity::Activity,
        facility::Facility,
        report::Report,
        reservation::Reservation,
        settings::SystemSettings,
        shift::EmployeeShift,
        time_slot::TimeSlot,
        user::{Employee, User},
    },
    reporting::{ReservationFact, SlotFact},
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmployee {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFacility {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub capacity: i32,
    pub opening_hour: i32,
    pub closing_hour: i32,
    pub status: String,
    pub activity_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbActivity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: i64,
    pub max_participants: i32,
    pub is_active: bool,
    pub facility_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
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
    pub status: String,
    pub total_price: i64,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The columns of a reservation row needed while it is locked for update.
#[derive(Debug, Clone, FromRow)]
pub struct DbReservationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_id: Uuid,
    pub time_slot_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShift {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub shift_type: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSettings {
    pub max_booking_lead_days: i32,
    pub cancellation_deadline_hours: i32,
    pub max_active_reservations_per_user: i32,
    pub default_opening_hour: i32,
    pub default_closing_hour: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReport {
    pub id: Uuid,
    pub report_type: String,
    pub generated_by: Uuid,
    pub period_from: Option<NaiveDate>,
    pub period_to: Option<NaiveDate>,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbReservationFact {
    pub facility_id: Uuid,
    pub facility_name: String,
    pub activity_id: Uuid,
    pub activity_name: String,
    pub status: String,
    pub total_price: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbSlotFact {
    pub facility_id: Uuid,
    pub facility_name: String,
    pub is_available: bool,
}

impl TryFrom<DbUser> for User {
    type Error = CourtError;

    fn try_from(row: DbUser) -> CourtResult<Self> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            role: row.role.parse()?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbEmployee> for Employee {
    fn from(row: DbEmployee) -> Self {
        Employee {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            position: row.position,
            hire_date: row.hire_date,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbFacility> for Facility {
    type Error = CourtError;

    fn try_from(row: DbFacility) -> CourtResult<Self> {
        Ok(Facility {
            id: row.id,
            name: row.name,
            description: row.description,
            location: row.location,
            capacity: row.capacity,
            opening_hour: row.opening_hour,
            closing_hour: row.closing_hour,
            status: row.status.parse()?,
            activity_ids: row.activity_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbActivity> for Activity {
    fn from(row: DbActivity) -> Self {
        Activity {
            id: row.id,
            name: row.name,
            description: row.description,
            duration_minutes: row.duration_minutes,
            price: row.price,
            max_participants: row.max_participants,
            is_active: row.is_active,
            facility_ids: row.facility_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            id: row.id,
            facility_id: row.facility_id,
            start_time: row.start_time,
            end_time: row.end_time,
            is_available: row.is_available,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbReservation> for Reservation {
    type Error = CourtError;

    fn try_from(row: DbReservation) -> CourtResult<Self> {
        Ok(Reservation {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            activity_id: row.activity_id,
            activity_name: row.activity_name,
            time_slot_id: row.time_slot_id,
            facility_id: row.facility_id,
            facility_name: row.facility_name,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse()?,
            total_price: row.total_price,
            cancellation_reason: row.cancellation_reason,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbShift> for EmployeeShift {
    type Error = CourtError;

    fn try_from(row: DbShift) -> CourtResult<Self> {
        Ok(EmployeeShift {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            start_time: row.start_time,
            end_time: row.end_time,
            shift_type: row.shift_type.parse()?,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

impl From<DbSettings> for SystemSettings {
    fn from(row: DbSettings) -> Self {
        SystemSettings {
            max_booking_lead_days: row.max_booking_lead_days,
            cancellation_deadline_hours: row.cancellation_deadline_hours,
            max_active_reservations_per_user: row.max_active_reservations_per_user,
            default_opening_hour: row.default_opening_hour,
            default_closing_hour: row.default_closing_hour,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<DbReport> for Report {
    type Error = CourtError;

    fn try_from(row: DbReport) -> CourtResult<Self> {
        Ok(Report {
            id: row.id,
            report_type: row.report_type.parse()?,
            generated_by: row.generated_by,
            period_from: row.period_from,
            period_to: row.period_to,
            data: row.data,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbReservationFact> for ReservationFact {
    type Error = CourtError;

    fn try_from(row: DbReservationFact) -> CourtResult<Self> {
        Ok(ReservationFact {
            facility_id: row.facility_id,
            facility_name: row.facility_name,
            activity_id: row.activity_id,
            activity_name: row.activity_name,
            status: row.status.parse()?,
            total_price: row.total_price,
        })
    }
}

impl From<DbSlotFact> for SlotFact {
    fn from(row: DbSlotFact) -> Self {
        SlotFact {
            facility_id: row.facility_id,
            facility_name: row.facility_name,
            is_available: row.is_available,
        }
    }
}

/// Converts a batch of rows, failing on the first row that does not map.
pub fn convert_all<R, T>(rows: Vec<R>) -> CourtResult<Vec<T>>
where
    T: TryFrom<R, Error = CourtError>,
{
    rows.into_iter().map(T::try_from).collect()
}
