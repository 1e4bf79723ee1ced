use courtside_core::models::{settings::SystemSettings, user::Role};
use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id SERIAL PRIMARY KEY,
        name VARCHAR(32) NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT ''
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        phone VARCHAR(32) NULL,
        role_id INTEGER NOT NULL REFERENCES roles(id),
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT users_email_key UNIQUE (email)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL UNIQUE REFERENCES users(id),
        position VARCHAR(100) NOT NULL,
        hire_date DATE NOT NULL DEFAULT CURRENT_DATE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employee_shifts (
        id UUID PRIMARY KEY,
        employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
        start_time TIMESTAMP WITH TIME ZONE NOT NULL,
        end_time TIMESTAMP WITH TIME ZONE NOT NULL,
        shift_type VARCHAR(16) NOT NULL
            CHECK (shift_type IN ('MORNING', 'AFTERNOON', 'EVENING', 'FULL_DAY')),
        notes TEXT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_shift_range CHECK (end_time > start_time)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS facilities (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        description TEXT NULL,
        location VARCHAR(200) NULL,
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        opening_hour INTEGER NOT NULL,
        closing_hour INTEGER NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'ACTIVE'
            CHECK (status IN ('ACTIVE', 'MAINTENANCE', 'CLOSED')),
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_operating_hours
            CHECK (opening_hour >= 0 AND closing_hour <= 24 AND closing_hour > opening_hour)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS activities (
        id UUID PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        description TEXT NULL,
        duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
        price BIGINT NOT NULL CHECK (price >= 0),
        max_participants INTEGER NOT NULL CHECK (max_participants > 0),
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS facility_activities (
        facility_id UUID NOT NULL REFERENCES facilities(id) ON DELETE CASCADE,
        activity_id UUID NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
        PRIMARY KEY (facility_id, activity_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS time_slots (
        id UUID PRIMARY KEY,
        facility_id UUID NOT NULL REFERENCES facilities(id) ON DELETE CASCADE,
        start_time TIMESTAMP WITH TIME ZONE NOT NULL,
        end_time TIMESTAMP WITH TIME ZONE NOT NULL,
        is_available BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_time_range CHECK (end_time > start_time),
        CONSTRAINT time_slots_facility_start_key UNIQUE (facility_id, start_time)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reservations (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id),
        activity_id UUID NOT NULL REFERENCES activities(id),
        time_slot_id UUID NOT NULL REFERENCES time_slots(id),
        status VARCHAR(16) NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'confirmed', 'cancelled')),
        total_price BIGINT NOT NULL,
        cancellation_reason TEXT NULL,
        notes TEXT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS system_settings (
        id INTEGER PRIMARY KEY DEFAULT 1 CHECK (id = 1),
        max_booking_lead_days INTEGER NOT NULL,
        cancellation_deadline_hours INTEGER NOT NULL,
        max_active_reservations_per_user INTEGER NOT NULL,
        default_opening_hour INTEGER NOT NULL,
        default_closing_hour INTEGER NOT NULL,
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reports (
        id UUID PRIMARY KEY,
        report_type VARCHAR(64) NOT NULL,
        generated_by UUID NOT NULL REFERENCES users(id),
        period_from DATE NULL,
        period_to DATE NULL,
        data JSONB NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
];

const INDEXES: &[&str] = &[
    // At most one pending or confirmed reservation per slot.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS reservations_active_slot_idx
        ON reservations(time_slot_id) WHERE status <> 'cancelled'
    "#,
    "CREATE INDEX IF NOT EXISTS idx_reservations_user_id ON reservations(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_reservations_activity_id ON reservations(activity_id)",
    "CREATE INDEX IF NOT EXISTS idx_time_slots_start_time ON time_slots(start_time)",
    "CREATE INDEX IF NOT EXISTS idx_time_slots_available ON time_slots(facility_id, is_available)",
    "CREATE INDEX IF NOT EXISTS idx_employee_shifts_employee_id ON employee_shifts(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_employee_shifts_start_time ON employee_shifts(start_time)",
    r#"
    CREATE INDEX IF NOT EXISTS idx_facility_activities_activity_id
        ON facility_activities(activity_id)
    "#,
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in TABLES.iter().chain(INDEXES) {
        sqlx::query(statement).execute(pool).await?;
    }

    seed_reference_data(pool).await?;

    info!("Database schema initialized successfully.");
    Ok(())
}

/// Roles and the settings row have to exist before the service can run.
async fn seed_reference_data(pool: &Pool<Postgres>) -> Result<()> {
    for role in Role::ALL {
        sqlx::query(
            r#"
            INSERT INTO roles (name, description)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(role.as_str())
        .bind(role.description())
        .execute(pool)
        .await?;
    }

    let defaults = SystemSettings::default();
    sqlx::query(
        r#"
        INSERT INTO system_settings (
            id, max_booking_lead_days, cancellation_deadline_hours,
            max_active_reservations_per_user, default_opening_hour, default_closing_hour
        )
        VALUES (1, $1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(defaults.max_booking_lead_days)
    .bind(defaults.cancellation_deadline_hours)
    .bind(defaults.max_active_reservations_per_user)
    .bind(defaults.default_opening_hour)
    .bind(defaults.default_closing_hour)
    .execute(pool)
    .await?;

    Ok(())
}
