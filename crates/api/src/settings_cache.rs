//! In-process copy of the settings singleton.
//!
//! The cache loads lazily through a [`SettingsStore`], is replaced wholesale
//! after an update, and is emptied when a load or save fails so the next
//! request retries the store.

use std::sync::Arc;

use chrono_tz::Tz;
use courtside_core::{booking::BookingPolicy, errors::CourtResult, models::settings::SystemSettings};
use courtside_db::repositories::settings::SettingsStore;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct SettingsCache {
    store: Arc<dyn SettingsStore>,
    cached: Arc<RwLock<Option<SystemSettings>>>,
}

impl SettingsCache {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get(&self) -> CourtResult<SystemSettings> {
        if let Some(settings) = self.cached.read().await.as_ref() {
            return Ok(settings.clone());
        }

        let mut cached = self.cached.write().await;
        if let Some(settings) = cached.as_ref() {
            return Ok(settings.clone());
        }
        match self.store.load().await {
            Ok(settings) => {
                *cached = Some(settings.clone());
                Ok(settings)
            }
            Err(err) => {
                tracing::warn!("Failed to load system settings: {}", err);
                *cached = None;
                Err(err)
            }
        }
    }

    /// Saves `settings` as they are and swaps the cached copy for the stored row.
    pub async fn update(&self, settings: &SystemSettings) -> CourtResult<SystemSettings> {
        self.modify(|_| Ok(settings.clone())).await
    }

    /// Derives new settings from the current ones and saves them. The write
    /// lock is held from the read to the save, so concurrent changes to
    /// different fields all land.
    pub async fn modify<F>(&self, change: F) -> CourtResult<SystemSettings>
    where
        F: FnOnce(&SystemSettings) -> CourtResult<SystemSettings>,
    {
        let mut cached = self.cached.write().await;
        let current = match cached.as_ref() {
            Some(settings) => settings.clone(),
            None => {
                let loaded = self.store.load().await.inspect_err(|err| {
                    tracing::warn!("Failed to load system settings: {}", err);
                })?;
                *cached = Some(loaded.clone());
                loaded
            }
        };

        let next = change(&current)?;
        match self.store.save(&next).await {
            Ok(saved) => {
                *cached = Some(saved.clone());
                Ok(saved)
            }
            Err(err) => {
                *cached = None;
                Err(err)
            }
        }
    }

    pub async fn policy(&self, timezone: Tz) -> CourtResult<BookingPolicy> {
        let settings = self.get().await?;
        Ok(BookingPolicy::new(&settings, timezone))
    }
}
