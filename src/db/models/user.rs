use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// An identity record. `corporate_id` and `github_username` are unique
/// across all users; the github handle may be unlinked.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub corporate_id: String,
    pub github_username: Option<String>,
    pub email: String,
    pub full_name: String,
    pub department: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewUser {
    pub corporate_id: String,
    pub github_username: Option<String>,
    pub email: String,
    pub full_name: String,
    pub department: String,
    pub role: String,
}

/// Full replace of the mutable profile fields. Soft-deactivation via
/// `is_active` is the expected operational pattern for departing users.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub github_username: Option<String>,
    pub email: String,
    pub full_name: String,
    pub department: String,
    pub role: String,
    pub is_active: bool,
}
