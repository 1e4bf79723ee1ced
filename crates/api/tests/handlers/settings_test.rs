use std::sync::Arc;

use chrono_tz::Tz;
use courtside_api::settings_cache::SettingsCache;
use courtside_core::{errors::CourtError, models::settings::SystemSettings};
use courtside_db::mock::repositories::MockSettingsStore;
use mockall::Sequence;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_cache_loads_once() {
    let mut store = MockSettingsStore::new();
    store
        .expect_load()
        .times(1)
        .returning(|| Ok(SystemSettings::default()));

    let cache = SettingsCache::new(Arc::new(store));
    let first = cache.get().await.unwrap();
    let second = cache.get().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_replaces_cached_copy() {
    let mut store = MockSettingsStore::new();
    store
        .expect_load()
        .times(1)
        .returning(|| Ok(SystemSettings::default()));
    store
        .expect_save()
        .times(1)
        .returning(|settings| Ok(settings.clone()));

    let cache = SettingsCache::new(Arc::new(store));
    let mut changed = cache.get().await.unwrap();
    changed.max_booking_lead_days = 14;

    cache.update(&changed).await.unwrap();
    assert_eq!(cache.get().await.unwrap().max_booking_lead_days, 14);

    let policy = cache.policy(Tz::UTC).await.unwrap();
    assert_eq!(policy.max_booking_lead_days, 14);
}

#[tokio::test]
async fn test_failed_load_is_retried() {
    let mut seq = Sequence::new();
    let mut store = MockSettingsStore::new();
    store
        .expect_load()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(CourtError::Database(eyre::eyre!("connection refused"))));
    store
        .expect_load()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(SystemSettings::default()));

    let cache = SettingsCache::new(Arc::new(store));
    assert!(cache.get().await.is_err());
    assert!(cache.get().await.is_ok());
}

#[tokio::test]
async fn test_concurrent_changes_both_land() {
    let mut seq = Sequence::new();
    let mut store = MockSettingsStore::new();
    store
        .expect_load()
        .times(1)
        .returning(|| Ok(SystemSettings::default()));
    store
        .expect_save()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|settings| Ok(settings.clone()));
    // The second save must build on the first.
    store
        .expect_save()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|settings| {
            settings.max_booking_lead_days != SystemSettings::DEFAULT_MAX_BOOKING_LEAD_DAYS
                && settings.cancellation_deadline_hours
                    != SystemSettings::DEFAULT_CANCELLATION_DEADLINE_HOURS
        })
        .returning(|settings| Ok(settings.clone()));

    let cache = SettingsCache::new(Arc::new(store));
    let (lead, deadline) = tokio::join!(
        cache.modify(|current| {
            Ok(SystemSettings {
                max_booking_lead_days: 30,
                ..current.clone()
            })
        }),
        cache.modify(|current| {
            Ok(SystemSettings {
                cancellation_deadline_hours: 2,
                ..current.clone()
            })
        }),
    );
    lead.unwrap();
    deadline.unwrap();

    let settings = cache.get().await.unwrap();
    assert_eq!(settings.max_booking_lead_days, 30);
    assert_eq!(settings.cancellation_deadline_hours, 2);
}

#[tokio::test]
async fn test_rejected_change_is_not_saved() {
    let mut store = MockSettingsStore::new();
    store
        .expect_load()
        .times(1)
        .returning(|| Ok(SystemSettings::default()));
    store.expect_save().times(0);

    let cache = SettingsCache::new(Arc::new(store));
    let result = cache
        .modify(|_| Err(CourtError::Validation("Closing hour must be after opening hour".into())))
        .await;
    assert!(matches!(result, Err(CourtError::Validation(_))));

    // The loaded copy is still served without another load.
    assert_eq!(
        cache.get().await.unwrap().max_booking_lead_days,
        SystemSettings::DEFAULT_MAX_BOOKING_LEAD_DAYS
    );
}
