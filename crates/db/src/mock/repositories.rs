use async_trait::async_trait;
use courtside_core::{errors::CourtResult, models::settings::SystemSettings};
use mockall::mock;

use crate::repositories::settings::SettingsStore;

mock! {
    pub SettingsStore {}

    #[async_trait]
    impl SettingsStore for SettingsStore {
        async fn load(&self) -> CourtResult<SystemSettings>;
        async fn save(&self, settings: &SystemSettings) -> CourtResult<SystemSettings>;
    }
}
