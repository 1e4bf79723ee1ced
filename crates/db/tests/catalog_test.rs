mod common;

use courtside_core::{errors::CourtError, models::facility::UpdateFacilityRequest};
use courtside_db::repositories::facility;
use pretty_assertions::assert_eq;

use common::*;

#[tokio::test]
async fn test_hours_check_violation_is_a_validation_error() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (court, _) = facility_with_activity(&pool).await;

    // Open 08:00-10:00; closing at 06:00 trips the table constraint.
    let err = facility::update_facility(
        &pool,
        court.id,
        &UpdateFacilityRequest {
            closing_hour: Some(6),
            ..UpdateFacilityRequest::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CourtError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Validation error: Closing hour must be after opening hour"
    );

    let unchanged = facility::get_facility_by_id(&pool, court.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.closing_hour, 10);
}
