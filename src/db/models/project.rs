// src/db/models/project.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalog status of a project. Open tag; the review workflow that mutates
/// it lives outside this backend, so unrecognized values pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStatus {
    Pending,
    Active,
    Approved,
    Other(String),
}

impl ProjectStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Active => "active",
            ProjectStatus::Approved => "approved",
            ProjectStatus::Other(tag) => tag,
        }
    }
}

impl From<&str> for ProjectStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => ProjectStatus::Pending,
            "active" => ProjectStatus::Active,
            "approved" => ProjectStatus::Approved,
            other => ProjectStatus::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ProjectStatus::from(s.as_str()))
    }
}

impl sqlx::Type<sqlx::Postgres> for ProjectStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for ProjectStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ProjectStatus {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(ProjectStatus::from(s))
    }
}

/// A catalog entry for a codebase.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub license: String,
    #[schema(value_type = String)]
    pub status: ProjectStatus,
    pub owner_id: Uuid,
    pub language: String,
    pub stars: i32,
    pub forks: i32,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission payload; status starts at `pending` and is mutated by the
/// review workflow external to this backend.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub url: String,
    pub license: String,
    pub owner_id: Uuid,
    pub language: String,
    #[serde(default)]
    pub stars: i32,
    #[serde(default)]
    pub forks: i32,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProject {
    pub name: String,
    pub description: String,
    pub url: String,
    pub license: String,
    #[schema(value_type = String)]
    pub status: ProjectStatus,
    pub language: String,
    pub stars: i32,
    pub forks: i32,
    pub is_public: bool,
}

/// A pre-vetted project, distinct from the caller-submitted catalog.
/// Reference data; creation is the only mutation path.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApprovedProject {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub license: String,
    pub maintainer_contact: String,
    pub approval_date: DateTime<Utc>,
    pub is_active: bool,
    pub allowed_contribution_types: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewApprovedProject {
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub license: String,
    pub maintainer_contact: String,
    #[serde(default)]
    pub allowed_contribution_types: Vec<String>,
}

/// Membership row joining a user to a project, carried with user display
/// fields for contributor listings.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProjectContributor {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub permissions: Vec<String>,
    pub corporate_id: String,
    pub github_username: Option<String>,
    pub full_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Role and permission set applied when adding a contributor. Re-adding an
/// existing (project, user) pair replaces both wholesale.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContributorGrant {
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_catalog_status_passes_through() {
        let status = ProjectStatus::from("archived");
        assert_eq!(status, ProjectStatus::Other("archived".to_owned()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"archived\"");
    }
}
