//! Session extraction and role checks.
//!
//! Every protected handler goes through [`authorize`], either directly or via
//! the [`CurrentUser`], [`StaffUser`] and [`AdminUser`] extractors.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use courtside_core::{
    booking::Actor,
    errors::CourtError,
    models::user::Role,
};
use uuid::Uuid;

use crate::{
    middleware::{auth, error_handling::AppError},
    ApiState,
};

/// The caller of a request, as recorded in their session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl SessionUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Role a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Staff,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDenial {
    Missing,
    Invalid(String),
    Forbidden(Access),
}

impl From<AuthDenial> for AppError {
    fn from(denial: AuthDenial) -> Self {
        let err = match denial {
            AuthDenial::Missing => {
                CourtError::Authentication("Authentication required".to_string())
            }
            AuthDenial::Invalid(reason) => CourtError::Authentication(reason),
            AuthDenial::Forbidden(Access::Admin) => {
                CourtError::Authorization("Administrator access required".to_string())
            }
            AuthDenial::Forbidden(_) => {
                CourtError::Authorization("Staff access required".to_string())
            }
        };
        AppError(err)
    }
}

/// Resolves the bearer token in `headers` and checks it grants `access`.
pub fn authorize(
    headers: &HeaderMap,
    secret: &str,
    access: Access,
) -> Result<SessionUser, AuthDenial> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthDenial::Missing)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthDenial::Invalid("Malformed Authorization header".to_string()))?;

    let claims = auth::verify_token(secret, token).map_err(|e| AuthDenial::Invalid(e.to_string()))?;
    let user = SessionUser {
        id: claims.sub,
        email: claims.email,
        name: claims.name,
        role: claims.role,
    };

    let allowed = match access {
        Access::Authenticated => true,
        Access::Staff => user.role.is_staff(),
        Access::Admin => user.role == Role::Admin,
    };
    if !allowed {
        tracing::warn!("User {} ({}) denied {:?} access", user.id, user.role, access);
        return Err(AuthDenial::Forbidden(access));
    }

    Ok(user)
}

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

/// ADMIN or EMPLOYEE.
#[derive(Debug, Clone)]
pub struct StaffUser(pub SessionUser);

#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authorize(&parts.headers, &state.config.jwt_secret, Access::Authenticated)?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authorize(&parts.headers, &state.config.jwt_secret, Access::Staff)?;
        Ok(StaffUser(user))
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authorize(&parts.headers, &state.config.jwt_secret, Access::Admin)?;
        Ok(AdminUser(user))
    }
}
