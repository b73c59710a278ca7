use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::request::{
    NewRequest, Request, RequestComment, RequestStats, RequestStatus, RequestType, UpdateRequest,
};
use crate::error::{Result, StoreError};

/// Data access for requests and their comment threads. Status transitions
/// go through [`update_status`](RequestStore::update_status); the lifecycle
/// layer decides whether a transition is legal before calling it.
pub struct RequestStore {
    pool: PgPool,
}

impl RequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a request under a freshly generated id. Rows always start
    /// `pending`; the column default supplies the status.
    pub async fn create(&self, new: NewRequest) -> Result<Request> {
        let request = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (id, type, title, description, requester_id, project_id,
                                  project_name, project_url, license, requested_role,
                                  approved_project_id, business_justification)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.request_type)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.requester_id)
        .bind(new.project_id)
        .bind(&new.project_name)
        .bind(&new.project_url)
        .bind(&new.license)
        .bind(&new.requested_role)
        .bind(new.approved_project_id)
        .bind(&new.business_justification)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn get(&self, id: Uuid) -> Result<Request> {
        sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("request", id))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Requests submitted by one user, newest first. With no status filter
    /// every status is returned.
    pub async fn by_requester(
        &self,
        requester_id: Uuid,
        status: Option<RequestStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Request>> {
        let requests = match status {
            Some(status) => {
                sqlx::query_as::<_, Request>(
                    r#"
                    SELECT * FROM requests
                    WHERE requester_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(requester_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Request>(
                    r#"
                    SELECT * FROM requests
                    WHERE requester_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(requester_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(requests)
    }

    pub async fn by_type(
        &self,
        request_type: &RequestType,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT * FROM requests
            WHERE type = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(request_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// The review queue: pending requests oldest first, so the earliest
    /// submission surfaces at the top.
    pub async fn pending(&self, limit: i64, offset: i64) -> Result<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT * FROM requests
            WHERE status = 'pending'
            ORDER BY created_at ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Unfiltered dashboard listing for one requester, newest first.
    pub async fn all_by_requester(&self, requester_id: Uuid) -> Result<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests WHERE requester_id = $1 ORDER BY created_at DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Apply a review decision in one statement. The decision timestamps
    /// are assigned under the same status guard as the status itself, so a
    /// row can never carry a status that disagrees with its timestamps.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: RequestStatus,
        reviewer_id: Option<Uuid>,
        rejection_reason: Option<String>,
    ) -> Result<Request> {
        sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests
            SET status = $2, reviewer_id = $3, rejection_reason = $4,
                approved_at = CASE WHEN $2 = 'approved' THEN now() ELSE approved_at END,
                rejected_at = CASE WHEN $2 = 'rejected' THEN now() ELSE rejected_at END,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewer_id)
        .bind(rejection_reason)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("request", id))
    }

    /// Metadata replace outside the review state machine. Restricted to
    /// pre-review edits by policy, not by this store.
    pub async fn update(&self, id: Uuid, update: UpdateRequest) -> Result<Request> {
        sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests
            SET title = $2, description = $3, status = $4, project_name = $5,
                project_url = $6, license = $7, requested_role = $8, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.status)
        .bind(&update.project_name)
        .bind(&update.project_url)
        .bind(&update.license)
        .bind(&update.requested_role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("request", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Append a comment and return it joined with the author display
    /// fields, in one round trip.
    pub async fn add_comment(
        &self,
        request_id: Uuid,
        user_id: Uuid,
        comment: &str,
        is_internal: bool,
    ) -> Result<RequestComment> {
        let comment = sqlx::query_as::<_, RequestComment>(
            r#"
            WITH inserted AS (
                INSERT INTO request_comments (request_id, user_id, comment, is_internal)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT i.id, i.request_id, i.user_id, i.comment, i.is_internal, i.created_at,
                   u.github_username, u.full_name
            FROM inserted i
            INNER JOIN users u ON i.user_id = u.id
            "#,
        )
        .bind(request_id)
        .bind(user_id)
        .bind(comment)
        .bind(is_internal)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Comment thread in display order, oldest first.
    pub async fn comments(&self, request_id: Uuid) -> Result<Vec<RequestComment>> {
        let comments = sqlx::query_as::<_, RequestComment>(
            r#"
            SELECT rc.id, rc.request_id, rc.user_id, rc.comment, rc.is_internal, rc.created_at,
                   u.github_username, u.full_name
            FROM request_comments rc
            INNER JOIN users u ON rc.user_id = u.id
            WHERE rc.request_id = $1
            ORDER BY rc.created_at ASC
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Per-status counts for one requester's summary dashboard.
    pub async fn stats(&self, requester_id: Uuid) -> Result<RequestStats> {
        let rows = sqlx::query_as::<_, (RequestStatus, i64)>(
            r#"
            SELECT status, COUNT(*)
            FROM requests
            WHERE requester_id = $1
            GROUP BY status
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = RequestStats::default();
        for (status, count) in rows {
            match status {
                RequestStatus::Pending => stats.pending = count,
                RequestStatus::Approved => stats.approved = count,
                RequestStatus::Rejected => stats.rejected = count,
            }
        }

        Ok(stats)
    }
}
