use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    /// Price in cents.
    pub price: i64,
    pub max_participants: i32,
    pub is_active: bool,
    pub facility_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 15, max = 480, message = "duration must be between 15 and 480 minutes"))]
    pub duration_minutes: i32,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: i64,
    #[validate(range(min = 1, max = 1000, message = "max participants must be between 1 and 1000"))]
    pub max_participants: i32,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub facility_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 15, max = 480, message = "duration must be between 15 and 480 minutes"))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: Option<i64>,
    #[validate(range(min = 1, max = 1000, message = "max participants must be between 1 and 1000"))]
    pub max_participants: Option<i32>,
    pub is_active: Option<bool>,
    /// Replaces the linked facilities when present.
    pub facility_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListQuery {
    #[serde(default)]
    pub active_only: bool,
    pub facility_id: Option<Uuid>,
}
