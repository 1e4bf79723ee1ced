use axum::{extract::State, Json};
use courtside_core::models::{
    facility::validate_operating_hours,
    settings::{PublicSettings, SystemSettings, UpdateSettingsRequest},
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    middleware::{error_handling::AppError, session::AdminUser},
    ApiState,
};

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<SystemSettings>, AppError> {
    Ok(Json(state.settings.get().await?))
}

#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<SystemSettings>, AppError> {
    payload.validate()?;

    let saved = state
        .settings
        .modify(|current| {
            let merged = payload.apply_to(current);
            validate_operating_hours(merged.default_opening_hour, merged.default_closing_hour)?;
            Ok(merged)
        })
        .await?;
    tracing::info!("Admin {} updated system settings", admin.id);
    Ok(Json(saved))
}

/// The booking-policy subset, readable without a session.
#[axum::debug_handler]
pub async fn public_settings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<PublicSettings>, AppError> {
    Ok(Json(state.settings.get().await?.public()))
}
