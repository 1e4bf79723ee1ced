use argon2::PasswordVerifier;
use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
use chrono::{Duration, Utc};
use courtside_api::middleware::{
    auth,
    error_handling::{map_error, AppError},
    session::{authorize, Access, AuthDenial},
};
use courtside_core::{errors::CourtError, models::user::Role};
use pretty_assertions::assert_eq;
use rstest::rstest;
use validator::Validate;

use crate::test_utils::{user_with_role, JWT_SECRET};

#[rstest]
#[case(CourtError::NotFound("Facility".into()), StatusCode::NOT_FOUND)]
#[case(CourtError::Validation("Bad hours".into()), StatusCode::BAD_REQUEST)]
#[case(CourtError::Authentication("No session".into()), StatusCode::UNAUTHORIZED)]
#[case(CourtError::Authorization("Staff only".into()), StatusCode::FORBIDDEN)]
#[case(CourtError::Conflict("Time slot is no longer available".into()), StatusCode::CONFLICT)]
#[case(CourtError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: CourtError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[derive(Validate)]
struct Sample {
    #[validate(range(min = 1, message = "capacity must be positive"))]
    capacity: i32,
}

#[tokio::test]
async fn test_invalid_input_carries_details() {
    let errors = Sample { capacity: 0 }.validate().unwrap_err();
    let response = map_error(CourtError::InvalidInput(errors));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    assert!(body["details"]["capacity"].is_array());
}

#[test]
fn test_app_error_from_eyre() {
    let err: AppError = eyre::eyre!("pool timed out").into();
    assert!(matches!(err.0, CourtError::Database(_)));
}

#[test]
fn test_hash_password() {
    let hashed = auth::hash_password("correct horse battery").unwrap();
    assert!(hashed.starts_with("$argon2"));

    let parsed = argon2::PasswordHash::new(&hashed).unwrap();
    let argon2 = argon2::Argon2::default();
    assert!(argon2.verify_password(b"correct horse battery", &parsed).is_ok());
    assert!(argon2.verify_password(b"wrong", &parsed).is_err());

    // Salted: the same password hashes differently every time.
    assert_ne!(hashed, auth::hash_password("correct horse battery").unwrap());
}

#[test]
fn test_random_password() {
    let password = auth::random_password();
    assert_eq!(password.len(), 32);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(password, auth::random_password());
}

#[test]
fn test_token_round_trip() {
    let user = user_with_role(Role::Employee);
    let (token, expires_at) = auth::issue_token(JWT_SECRET, &user, 24, Utc::now()).unwrap();

    let claims = auth::verify_token(JWT_SECRET, &token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, Role::Employee);
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_token_rejections() {
    let user = user_with_role(Role::User);

    let (token, _) = auth::issue_token(JWT_SECRET, &user, 24, Utc::now()).unwrap();
    assert!(matches!(
        auth::verify_token("another-secret", &token),
        Err(CourtError::Authentication(_))
    ));

    let (expired, _) =
        auth::issue_token(JWT_SECRET, &user, 1, Utc::now() - Duration::hours(3)).unwrap();
    assert!(auth::verify_token(JWT_SECRET, &expired).is_err());
}

fn headers_for(role: Role) -> HeaderMap {
    let (token, _) = auth::issue_token(JWT_SECRET, &user_with_role(role), 1, Utc::now()).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[rstest]
#[case(Role::User, Access::Authenticated, true)]
#[case(Role::User, Access::Staff, false)]
#[case(Role::Employee, Access::Staff, true)]
#[case(Role::Employee, Access::Admin, false)]
#[case(Role::Admin, Access::Staff, true)]
#[case(Role::Admin, Access::Admin, true)]
fn test_authorize_roles(#[case] role: Role, #[case] access: Access, #[case] allowed: bool) {
    match authorize(&headers_for(role), JWT_SECRET, access) {
        Ok(user) => {
            assert!(allowed);
            assert_eq!(user.role, role);
        }
        Err(denial) => {
            assert!(!allowed);
            assert_eq!(denial, AuthDenial::Forbidden(access));
        }
    }
}

#[test]
fn test_authorize_missing_and_malformed() {
    assert_eq!(
        authorize(&HeaderMap::new(), JWT_SECRET, Access::Authenticated),
        Err(AuthDenial::Missing)
    );

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    assert!(matches!(
        authorize(&headers, JWT_SECRET, Access::Authenticated),
        Err(AuthDenial::Invalid(_))
    ));

    let denied: AppError = AuthDenial::Missing.into();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    let forbidden: AppError = AuthDenial::Forbidden(Access::Admin).into();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
}
