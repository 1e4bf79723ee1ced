//! # Authentication Module
//!
//! Password hashing and session tokens for the Courtside API.
//!
//! Passwords are hashed with Argon2 and stored as PHC strings; verification
//! happens in the db crate next to the user lookup. Sessions are stateless
//! HS256 JWTs carrying the user's id, email, name and role.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use chrono::{DateTime, Duration, Utc};
use courtside_core::{
    errors::{CourtError, CourtResult},
    models::user::{Role, User},
};
use eyre::Result;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call, and the result is a PHC
/// string (algorithm, version, parameters, salt and hash).
///
/// # Example
///
/// ```rust
/// use courtside_api::middleware::auth::hash_password;
///
/// let hashed = hash_password("correct horse battery").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Password for accounts created on a customer's behalf. Nobody is told it;
/// the customer gets access once an admin sets a real one.
pub fn random_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    pub iat: i64,
}

/// Signs a session token for `user`, valid for `ttl_hours` from `now`.
pub fn issue_token(
    secret: &str,
    user: &User,
    ttl_hours: i64,
    now: DateTime<Utc>,
) -> CourtResult<(String, DateTime<Utc>)> {
    let expires_at = now + Duration::hours(ttl_hours);
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CourtError::Internal(Box::new(e)))?;

    Ok((token, expires_at))
}

/// Checks the signature and expiry of a session token.
pub fn verify_token(secret: &str, token: &str) -> CourtResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| CourtError::Authentication(format!("Invalid session token: {}", e)))
}
