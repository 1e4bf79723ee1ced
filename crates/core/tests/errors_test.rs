use std::error::Error;

use courtside_core::errors::{CourtError, CourtResult};
use validator::Validate;

#[test]
fn test_court_error_display() {
    let not_found = CourtError::NotFound("Facility not found".to_string());
    let validation = CourtError::Validation("Invalid input".to_string());
    let authentication = CourtError::Authentication("Invalid password".to_string());
    let authorization = CourtError::Authorization("Not authorized".to_string());
    let conflict = CourtError::Conflict("Time slot is no longer available".to_string());
    let database = CourtError::Database(eyre::eyre!("Database connection failed"));
    let internal = CourtError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Facility not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Invalid password"
    );
    assert_eq!(authorization.to_string(), "Authorization error: Not authorized");
    assert_eq!(
        conflict.to_string(),
        "Conflict: Time slot is no longer available"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_not_found_helper() {
    let err = CourtError::not_found("Reservation", "abc");
    assert_eq!(
        err.to_string(),
        "Resource not found: Reservation with ID abc not found"
    );
}

#[test]
fn test_client_error_classification() {
    assert!(CourtError::Conflict("taken".into()).is_client_error());
    assert!(CourtError::Validation("bad".into()).is_client_error());
    assert!(!CourtError::Database(eyre::eyre!("down")).is_client_error());
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let court_error = CourtError::Internal(Box::new(io_error));

    assert!(court_error.source().is_some());
}

#[test]
fn test_validation_errors_convert() {
    let request = courtside_core::models::user::LoginRequest {
        email: "not-an-email".to_string(),
        password: String::new(),
    };
    let err: CourtError = request.validate().unwrap_err().into();

    match err {
        CourtError::InvalidInput(errors) => {
            let fields = errors.field_errors();
            assert!(fields.contains_key("email"));
            assert!(fields.contains_key("password"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_court_result() {
    let result: CourtResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: CourtResult<i32> = Err(CourtError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}
