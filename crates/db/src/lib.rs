pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use courtside_core::errors::CourtError;
use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Maps a sqlx error onto the domain taxonomy.
///
/// Unique and foreign-key violations and serialization failures become
/// conflicts, check violations become validation errors, and everything else
/// is a database error.
pub fn db_error(err: sqlx::Error) -> CourtError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                let message = match db_err.constraint() {
                    Some("users_email_key") => "A user with this email already exists",
                    Some("reservations_active_slot_idx") => "Time slot is no longer available",
                    Some("time_slots_facility_start_key") => {
                        "A time slot already exists at this start time"
                    }
                    _ => "A record with the same unique value already exists",
                };
                return CourtError::Conflict(message.to_string());
            }
            Some("23503") => {
                return CourtError::Conflict(
                    "The record is still referenced by other records".to_string(),
                );
            }
            Some("23514") => {
                let message = match db_err.constraint() {
                    Some("valid_operating_hours") => "Closing hour must be after opening hour",
                    Some("valid_shift_range") => "Shift end time must be after start time",
                    _ => "The request violates a data constraint",
                };
                return CourtError::Validation(message.to_string());
            }
            Some("40001") | Some("40P01") => {
                return CourtError::Conflict(
                    "The request collided with a concurrent update, please retry".to_string(),
                );
            }
            _ => {}
        }
    }
    CourtError::Database(err.into())
}
