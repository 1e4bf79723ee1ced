use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use courtside_core::{
    errors::CourtError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, Role, User},
};
use courtside_db::repositories::user::{self, NewUser};
use std::sync::Arc;
use validator::Validate;

use crate::{
    middleware::{auth, error_handling::AppError, session::CurrentUser},
    ApiState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate()?;

    let password_hash = auth::hash_password(&payload.password)?;
    let created = user::create_user(
        &state.db_pool,
        &NewUser {
            name: payload.name.trim(),
            email: payload.email.trim(),
            password_hash: &password_hash,
            phone: payload.phone.as_deref(),
            role: Role::User,
        },
        None,
    )
    .await?;

    tracing::info!("Registered user {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let user =
        user::verify_credentials(&state.db_pool, payload.email.trim(), &payload.password).await?;
    let (token, expires_at) = auth::issue_token(
        &state.config.jwt_secret,
        &user,
        state.config.session_ttl_hours,
        Utc::now(),
    )?;

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user,
    }))
}

/// The signed-in user, re-read so a disabled account loses its session.
#[axum::debug_handler]
pub async fn session(
    State(state): State<Arc<ApiState>>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<User>, AppError> {
    let user = user::get_user_by_id(&state.db_pool, session.id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| CourtError::Authentication("Session is no longer valid".to_string()))?;

    Ok(Json(user))
}
