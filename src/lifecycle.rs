//! Request submission and the review state machine.
//!
//! A request starts `pending` and moves exactly once, to `approved` or
//! `rejected`. Both end states are terminal. Submissions validate their
//! required fields before any row is written; transition legality is
//! checked against the current row before the conditional update runs.
//! The read-then-update window is tolerated: statements are atomic and the
//! last write wins, per the concurrency model of the surrounding service.

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::request::{NewRequest, Request, RequestStatus, RequestType};
use crate::db::queries::request::RequestStore;
use crate::error::{Result, StoreError};

/// Submission payload for a project onboarding request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitProjectRequest {
    pub requester_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub project_name: String,
    pub project_url: String,
    pub license: Option<String>,
}

/// Submission payload for a pull-request approval. `pr_url` is stored in
/// the request's project_url slot.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitPullRequestApproval {
    pub requester_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub project_name: String,
    pub pr_url: String,
}

/// Submission payload for an access request against a catalog project.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitAccessRequest {
    pub requester_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<Uuid>,
    pub project_name: String,
    pub role: String,
}

/// Submission payload for contribution permission on a pre-vetted project.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitContributionPermissionRequest {
    pub requester_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub approved_project_id: Uuid,
    pub business_justification: Option<String>,
}

impl SubmitProjectRequest {
    fn into_new_request(self) -> Result<NewRequest> {
        require("title", &self.title)?;
        require("project_name", &self.project_name)?;
        require("project_url", &self.project_url)?;

        Ok(NewRequest {
            request_type: RequestType::Project,
            title: self.title,
            description: self.description,
            requester_id: self.requester_id,
            project_id: None,
            project_name: Some(self.project_name),
            project_url: Some(self.project_url),
            license: self.license,
            requested_role: None,
            approved_project_id: None,
            business_justification: None,
        })
    }
}

impl SubmitPullRequestApproval {
    fn into_new_request(self) -> Result<NewRequest> {
        require("title", &self.title)?;
        require("project_name", &self.project_name)?;
        require("pr_url", &self.pr_url)?;

        Ok(NewRequest {
            request_type: RequestType::PullRequest,
            title: self.title,
            description: self.description,
            requester_id: self.requester_id,
            project_id: None,
            project_name: Some(self.project_name),
            project_url: Some(self.pr_url),
            license: None,
            requested_role: None,
            approved_project_id: None,
            business_justification: None,
        })
    }
}

impl SubmitAccessRequest {
    fn into_new_request(self) -> Result<NewRequest> {
        require("title", &self.title)?;
        require("project_name", &self.project_name)?;
        require("role", &self.role)?;

        Ok(NewRequest {
            request_type: RequestType::Access,
            title: self.title,
            description: self.description,
            requester_id: self.requester_id,
            project_id: self.project_id,
            project_name: Some(self.project_name),
            project_url: None,
            license: None,
            requested_role: Some(self.role),
            approved_project_id: None,
            business_justification: None,
        })
    }
}

impl SubmitContributionPermissionRequest {
    fn into_new_request(self) -> Result<NewRequest> {
        require("title", &self.title)?;

        Ok(NewRequest {
            request_type: RequestType::ContributionPermission,
            title: self.title,
            description: self.description,
            requester_id: self.requester_id,
            project_id: None,
            project_name: None,
            project_url: None,
            license: None,
            requested_role: None,
            approved_project_id: Some(self.approved_project_id),
            business_justification: self.business_justification,
        })
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidArgument(format!("{field} is required")));
    }
    Ok(())
}

/// Transitions are only legal out of `pending`.
fn ensure_pending(current: RequestStatus) -> Result<()> {
    match current {
        RequestStatus::Pending => Ok(()),
        status => Err(StoreError::InvalidTransition { current: status }),
    }
}

/// The review state machine over [`RequestStore`].
pub struct RequestLifecycle {
    store: RequestStore,
}

impl RequestLifecycle {
    pub fn new(store: RequestStore) -> Self {
        Self { store }
    }

    pub async fn submit_project(&self, payload: SubmitProjectRequest) -> Result<Request> {
        self.store.create(payload.into_new_request()?).await
    }

    pub async fn submit_pull_request(&self, payload: SubmitPullRequestApproval) -> Result<Request> {
        self.store.create(payload.into_new_request()?).await
    }

    pub async fn submit_access(&self, payload: SubmitAccessRequest) -> Result<Request> {
        self.store.create(payload.into_new_request()?).await
    }

    pub async fn submit_contribution_permission(
        &self,
        payload: SubmitContributionPermissionRequest,
    ) -> Result<Request> {
        self.store.create(payload.into_new_request()?).await
    }

    /// `pending -> approved`. Records the reviewer and stamps approved_at.
    pub async fn approve(&self, id: Uuid, reviewer_id: Uuid) -> Result<Request> {
        let current = self.store.get(id).await?;
        ensure_pending(current.status)?;

        self.store
            .update_status(id, RequestStatus::Approved, Some(reviewer_id), None)
            .await
    }

    /// `pending -> rejected`. Requires a non-empty reason alongside the
    /// reviewer and stamps rejected_at.
    pub async fn reject(&self, id: Uuid, reviewer_id: Uuid, reason: String) -> Result<Request> {
        require("rejection_reason", &reason)?;

        let current = self.store.get(id).await?;
        ensure_pending(current.status)?;

        self.store
            .update_status(id, RequestStatus::Rejected, Some(reviewer_id), Some(reason))
            .await
    }

    /// Dispatch a review decision from a raw status tag. `pending` is not a
    /// decision and unknown tags never reach the store.
    pub async fn decide(
        &self,
        id: Uuid,
        status: &str,
        reviewer_id: Uuid,
        rejection_reason: Option<String>,
    ) -> Result<Request> {
        match RequestStatus::parse(status) {
            Some(RequestStatus::Approved) => self.approve(id, reviewer_id).await,
            Some(RequestStatus::Rejected) => {
                let reason = rejection_reason.unwrap_or_default();
                self.reject(id, reviewer_id, reason).await
            }
            Some(RequestStatus::Pending) | None => Err(StoreError::InvalidArgument(format!(
                "invalid decision status: {status:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access_payload() -> SubmitAccessRequest {
        SubmitAccessRequest {
            requester_id: Uuid::new_v4(),
            title: "Access to libfoo".into(),
            description: None,
            project_id: None,
            project_name: "libfoo".into(),
            role: "maintainer".into(),
        }
    }

    #[test]
    fn access_submission_builds_pending_insert() {
        let payload = access_payload();
        let requester_id = payload.requester_id;
        let new = payload.into_new_request().unwrap();

        assert_eq!(new.request_type, RequestType::Access);
        assert_eq!(new.requester_id, requester_id);
        assert_eq!(new.project_name.as_deref(), Some("libfoo"));
        assert_eq!(new.requested_role.as_deref(), Some("maintainer"));
    }

    #[test]
    fn missing_required_field_is_invalid_argument() {
        let mut payload = access_payload();
        payload.project_name = "  ".into();

        match payload.into_new_request() {
            Err(StoreError::InvalidArgument(msg)) => {
                assert!(msg.contains("project_name"));
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn project_submission_requires_url() {
        let payload = SubmitProjectRequest {
            requester_id: Uuid::new_v4(),
            title: "Onboard libfoo".into(),
            description: Some("internal fork".into()),
            project_name: "libfoo".into(),
            project_url: String::new(),
            license: Some("MIT".into()),
        };

        assert!(matches!(
            payload.into_new_request(),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn pull_request_url_lands_in_project_url() {
        let payload = SubmitPullRequestApproval {
            requester_id: Uuid::new_v4(),
            title: "Upstream fix".into(),
            description: None,
            project_name: "libfoo".into(),
            pr_url: "https://github.com/org/libfoo/pull/42".into(),
        };

        let new = payload.into_new_request().unwrap();
        assert_eq!(new.request_type, RequestType::PullRequest);
        assert_eq!(
            new.project_url.as_deref(),
            Some("https://github.com/org/libfoo/pull/42")
        );
    }

    #[test]
    fn contribution_permission_keeps_justification_optional() {
        let payload = SubmitContributionPermissionRequest {
            requester_id: Uuid::new_v4(),
            title: "Contribute to libbar".into(),
            description: None,
            approved_project_id: Uuid::new_v4(),
            business_justification: None,
        };

        let new = payload.into_new_request().unwrap();
        assert_eq!(new.request_type, RequestType::ContributionPermission);
        assert!(new.approved_project_id.is_some());
        assert!(new.business_justification.is_none());
    }

    #[tokio::test]
    async fn decide_rejects_bad_status_before_touching_the_store() {
        // connect_lazy opens no connection; these paths must fail validation
        // before any query is issued.
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        let lifecycle = RequestLifecycle::new(RequestStore::new(pool));

        let result = lifecycle
            .decide(Uuid::new_v4(), "cancelled", Uuid::new_v4(), None)
            .await;
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));

        let result = lifecycle
            .decide(Uuid::new_v4(), "pending", Uuid::new_v4(), None)
            .await;
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn rejecting_without_a_reason_is_invalid() {
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        let lifecycle = RequestLifecycle::new(RequestStore::new(pool));

        let result = lifecycle
            .reject(Uuid::new_v4(), Uuid::new_v4(), "  ".into())
            .await;
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[test]
    fn only_pending_may_transition() {
        assert!(ensure_pending(RequestStatus::Pending).is_ok());

        for terminal in [RequestStatus::Approved, RequestStatus::Rejected] {
            match ensure_pending(terminal) {
                Err(StoreError::InvalidTransition { current }) => {
                    assert_eq!(current, terminal);
                }
                other => panic!("expected InvalidTransition, got {other:?}"),
            }
        }
    }
}
