use crate::{
    db_error,
    models::{convert_all, DbEmployee, DbUser},
};
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::user::{Employee, Role, UpdateUserRequest, User},
};
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str = r#"
    u.id, u.name, u.email, u.password_hash, u.phone, r.name AS role,
    u.is_active, u.created_at, u.updated_at
"#;

pub const SEARCH_LIMIT: i64 = 20;

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
    pub role: Role,
}

pub async fn insert_user<'e, E>(conn: E, user: &NewUser<'_>) -> CourtResult<User>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, role={}", id, user.role);

    let row = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        WITH u AS (
            INSERT INTO users (
                id, name, email, password_hash, phone, role_id, created_at, updated_at
            )
            VALUES ($1, $2, LOWER($3), $4, $5, (SELECT id FROM roles WHERE name = $6), $7, $7)
            RETURNING *
        )
        SELECT {USER_COLUMNS}
        FROM u JOIN roles r ON r.id = u.role_id
        "#
    ))
    .bind(id)
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.phone)
    .bind(user.role.as_str())
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(db_error)?;

    row.try_into()
}

/// Creates a user and, for employees, the matching employee profile.
pub async fn create_user(
    pool: &Pool<Postgres>,
    user: &NewUser<'_>,
    position: Option<&str>,
) -> CourtResult<User> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let created = insert_user(&mut *tx, user).await?;
    if created.role == Role::Employee {
        sqlx::query(
            r#"
            INSERT INTO employees (id, user_id, position, hire_date, created_at)
            VALUES ($1, $2, $3, CURRENT_DATE, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(created.id)
        .bind(position.unwrap_or("Staff"))
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    }

    tx.commit().await.map_err(db_error)?;
    Ok(created)
}

pub async fn get_user_by_id<'e, E>(conn: E, id: Uuid) -> CourtResult<Option<User>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users u JOIN roles r ON r.id = u.role_id
        WHERE u.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(db_error)?;

    row.map(User::try_from).transpose()
}

/// Emails are stored lowercase, so the lookup is case-insensitive.
pub async fn get_user_by_email<'e, E>(conn: E, email: &str) -> CourtResult<Option<DbUser>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users u JOIN roles r ON r.id = u.role_id
        WHERE u.email = LOWER($1)
        "#
    ))
    .bind(email)
    .fetch_optional(conn)
    .await
    .map_err(db_error)
}

pub async fn list_users(pool: &Pool<Postgres>, role: Option<Role>) -> CourtResult<Vec<User>> {
    let rows = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users u JOIN roles r ON r.id = u.role_id
        WHERE ($1::TEXT IS NULL OR r.name = $1)
        ORDER BY u.name ASC
        "#
    ))
    .bind(role.map(|r| r.as_str()))
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    convert_all(rows)
}

pub async fn search_users(pool: &Pool<Postgres>, query: &str) -> CourtResult<Vec<User>> {
    let pattern = format!("%{}%", query.trim());
    let rows = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users u JOIN roles r ON r.id = u.role_id
        WHERE u.is_active AND (u.name ILIKE $1 OR u.email ILIKE $1)
        ORDER BY u.name ASC
        LIMIT $2
        "#
    ))
    .bind(pattern)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    convert_all(rows)
}

/// Partial update. `password_hash` is the already hashed replacement, if any.
pub async fn update_user(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateUserRequest,
    password_hash: Option<&str>,
) -> CourtResult<User> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let result = sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            role_id = COALESCE((SELECT id FROM roles WHERE name = $4), role_id),
            is_active = COALESCE($5, is_active),
            password_hash = COALESCE($6, password_hash),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(req.name.as_deref())
    .bind(req.phone.as_deref())
    .bind(req.role.map(|r| r.as_str()))
    .bind(req.is_active)
    .bind(password_hash)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(CourtError::not_found("User", id));
    }

    if req.role == Some(Role::Employee) {
        sqlx::query(
            r#"
            INSERT INTO employees (id, user_id, position, hire_date, created_at)
            VALUES ($1, $2, 'Staff', CURRENT_DATE, NOW())
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    }

    let user = get_user_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CourtError::not_found("User", id))?;

    tx.commit().await.map_err(db_error)?;
    Ok(user)
}

/// Users are never hard-deleted; reservations keep referencing them.
pub async fn disable_user(pool: &Pool<Postgres>, id: Uuid) -> CourtResult<User> {
    let req = UpdateUserRequest {
        is_active: Some(false),
        ..Default::default()
    };
    update_user(pool, id, &req, None).await
}

/// Returns the user when the email and password match an active account.
pub async fn verify_credentials(
    pool: &Pool<Postgres>,
    email: &str,
    password: &str,
) -> CourtResult<User> {
    let invalid = || CourtError::Authentication("Invalid email or password".to_string());

    let row = get_user_by_email(pool, email).await?.ok_or_else(invalid)?;
    if !row.is_active {
        tracing::debug!("Rejected login for disabled user {}", row.id);
        return Err(invalid());
    }

    let parsed_hash = argon2::PasswordHash::new(&row.password_hash)
        .map_err(|e| CourtError::Database(eyre::eyre!("Invalid password hash: {}", e)))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    row.try_into()
}

pub async fn list_employees(pool: &Pool<Postgres>) -> CourtResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, DbEmployee>(
        r#"
        SELECT e.id, e.user_id, u.name, u.email, e.position, e.hire_date, e.created_at
        FROM employees e JOIN users u ON u.id = e.user_id
        ORDER BY u.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_employee_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> CourtResult<Option<Employee>> {
    let row = sqlx::query_as::<_, DbEmployee>(
        r#"
        SELECT e.id, e.user_id, u.name, u.email, e.position, e.hire_date, e.created_at
        FROM employees e JOIN users u ON u.id = e.user_id
        WHERE e.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    Ok(row.map(Into::into))
}
