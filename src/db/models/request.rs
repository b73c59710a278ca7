// src/db/models/request.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Review status of a request. Closed set; anything else is rejected at the
/// operation boundary before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of request. The wire tags are open by design; values we do not
/// recognize are preserved through `Other` rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestType {
    Project,
    PullRequest,
    Access,
    ContributionPermission,
    Other(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            RequestType::Project => "project",
            RequestType::PullRequest => "pullrequest",
            RequestType::Access => "access",
            RequestType::ContributionPermission => "contribution_permission",
            RequestType::Other(tag) => tag,
        }
    }
}

impl From<&str> for RequestType {
    fn from(s: &str) -> Self {
        match s {
            "project" => RequestType::Project,
            "pullrequest" => RequestType::PullRequest,
            "access" => RequestType::Access,
            "contribution_permission" => RequestType::ContributionPermission,
            other => RequestType::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RequestType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(RequestType::from(s.as_str()))
    }
}

// Both enums live in TEXT columns; encode as the tag string, decode by
// parsing it back.

impl sqlx::Type<sqlx::Postgres> for RequestStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for RequestStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for RequestStatus {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        RequestStatus::parse(s).ok_or_else(|| format!("unrecognized request status: {s}").into())
    }
}

impl sqlx::Type<sqlx::Postgres> for RequestType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for RequestType {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for RequestType {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RequestType::from(s))
    }
}

/// A request for project onboarding, pull-request approval, access, or
/// contribution permission.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Request {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    #[schema(value_type = String)]
    pub request_type: RequestType,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub status: RequestStatus,
    pub requester_id: Uuid,
    pub reviewer_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub project_url: Option<String>,
    pub license: Option<String>,
    #[serde(rename = "role")]
    pub requested_role: Option<String>,
    pub approved_project_id: Option<Uuid>,
    pub business_justification: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a request. Status is always `pending` on insert;
/// built by the lifecycle submission constructors.
#[derive(Debug)]
pub struct NewRequest {
    pub request_type: RequestType,
    pub title: String,
    pub description: Option<String>,
    pub requester_id: Uuid,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub project_url: Option<String>,
    pub license: Option<String>,
    pub requested_role: Option<String>,
    pub approved_project_id: Option<Uuid>,
    pub business_justification: Option<String>,
}

/// Metadata replace for a request. This edits fields outside the review
/// state machine; restrict to pre-review edits by policy.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequest {
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub status: RequestStatus,
    pub project_name: Option<String>,
    pub project_url: Option<String>,
    pub license: Option<String>,
    #[serde(rename = "role")]
    pub requested_role: Option<String>,
}

/// Comment on a request, joined with author display fields.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestComment {
    pub id: Uuid,
    pub request_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub is_internal: bool,
    pub github_username: Option<String>,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// Per-status request counts for one requester.
#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RequestStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_strict() {
        assert_eq!(RequestStatus::parse("approved"), Some(RequestStatus::Approved));
        assert_eq!(RequestStatus::parse("cancelled"), None);
        assert_eq!(RequestStatus::parse(""), None);
        assert_eq!(RequestStatus::parse("Pending"), None);
    }

    #[test]
    fn unknown_type_tags_survive() {
        let tag = RequestType::from("security_exception");
        assert_eq!(tag, RequestType::Other("security_exception".to_owned()));
        assert_eq!(tag.as_str(), "security_exception");
    }

    #[test]
    fn type_serializes_as_flat_string() {
        let json = serde_json::to_string(&RequestType::ContributionPermission).unwrap();
        assert_eq!(json, "\"contribution_permission\"");
        let back: RequestType = serde_json::from_str("\"pullrequest\"").unwrap();
        assert_eq!(back, RequestType::PullRequest);
    }
}
