use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use courtside_core::{
    errors::CourtError,
    models::user::{
        CreateUserRequest, Role, UpdateUserRequest, User, UserListQuery, UserSearchQuery,
    },
};
use courtside_db::repositories::user::{self, NewUser};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::{
        auth,
        error_handling::AppError,
        session::{AdminUser, StaffUser},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = user::list_users(&state.db_pool, query.role).await?;
    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate()?;

    let password_hash = auth::hash_password(&payload.password)?;
    let position = match payload.role {
        Role::Employee => payload.position.as_deref(),
        _ => None,
    };
    let created = user::create_user(
        &state.db_pool,
        &NewUser {
            name: payload.name.trim(),
            email: payload.email.trim(),
            password_hash: &password_hash,
            phone: payload.phone.as_deref(),
            role: payload.role,
        },
        position,
    )
    .await?;

    tracing::info!("Admin {} created {} user {}", admin.id, created.role, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;

    if id == admin.id && payload.is_active == Some(false) {
        return Err(
            CourtError::Validation("You cannot disable your own account".to_string()).into(),
        );
    }

    let password_hash = match &payload.password {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let updated = user::update_user(&state.db_pool, id, &payload, password_hash.as_deref()).await?;
    Ok(Json(updated))
}

/// Soft delete: the account is disabled, never removed.
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if id == admin.id {
        return Err(
            CourtError::Validation("You cannot disable your own account".to_string()).into(),
        );
    }

    user::disable_user(&state.db_pool, id).await?;
    tracing::info!("Admin {} disabled user {}", admin.id, id);
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn search_users(
    State(state): State<Arc<ApiState>>,
    _staff: StaffUser,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    if query.query.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let users = user::search_users(&state.db_pool, &query.query).await?;
    Ok(Json(users))
}
