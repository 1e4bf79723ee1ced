use crate::{db_error, models::DbSettings, DbPool};
use async_trait::async_trait;
use courtside_core::{errors::CourtResult, models::settings::SystemSettings};

/// Storage for the settings singleton.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> CourtResult<SystemSettings>;

    /// Persists `settings` and returns the stored row.
    async fn save(&self, settings: &SystemSettings) -> CourtResult<SystemSettings>;
}

#[derive(Clone)]
pub struct PgSettingsStore {
    pool: DbPool,
}

impl PgSettingsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn load(&self) -> CourtResult<SystemSettings> {
        let row = sqlx::query_as::<_, DbSettings>(
            r#"
            SELECT max_booking_lead_days, cancellation_deadline_hours,
                max_active_reservations_per_user, default_opening_hour,
                default_closing_hour, updated_at
            FROM system_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        // Falls back to defaults until the bootstrap has inserted the row.
        Ok(row.map(SystemSettings::from).unwrap_or_default())
    }

    async fn save(&self, settings: &SystemSettings) -> CourtResult<SystemSettings> {
        let row = sqlx::query_as::<_, DbSettings>(
            r#"
            INSERT INTO system_settings (
                id, max_booking_lead_days, cancellation_deadline_hours,
                max_active_reservations_per_user, default_opening_hour,
                default_closing_hour, updated_at
            )
            VALUES (1, $1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id) DO UPDATE SET
                max_booking_lead_days = EXCLUDED.max_booking_lead_days,
                cancellation_deadline_hours = EXCLUDED.cancellation_deadline_hours,
                max_active_reservations_per_user = EXCLUDED.max_active_reservations_per_user,
                default_opening_hour = EXCLUDED.default_opening_hour,
                default_closing_hour = EXCLUDED.default_closing_hour,
                updated_at = EXCLUDED.updated_at
            RETURNING max_booking_lead_days, cancellation_deadline_hours,
                max_active_reservations_per_user, default_opening_hour,
                default_closing_hour, updated_at
            "#,
        )
        .bind(settings.max_booking_lead_days)
        .bind(settings.cancellation_deadline_hours)
        .bind(settings.max_active_reservations_per_user)
        .bind(settings.default_opening_hour)
        .bind(settings.default_closing_hour)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        tracing::debug!("System settings saved");
        Ok(row.into())
    }
}
