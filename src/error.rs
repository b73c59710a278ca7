use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use crate::db::models::request::RequestStatus;
use crate::utils::api_response::ApiResponse;

/// Result type alias used by all store and lifecycle operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors produced by the store and lifecycle layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lookup by primary or alternate key matched zero rows.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A uniqueness constraint was violated on insert or upsert.
    #[error("duplicate key: {constraint}")]
    DuplicateKey { constraint: String },

    /// A submission or transition was attempted with missing required
    /// fields or a disallowed status value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An attempted status change does not originate from `pending`.
    #[error("invalid transition: request is already {current}")]
    InvalidTransition { current: RequestStatus },

    /// The underlying database could not be reached or a query failed for
    /// reasons unrelated to the data. Not retried here; retries belong to
    /// the caller.
    #[error("store unavailable: {0}")]
    Unavailable(sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::DuplicateKey { .. } => StatusCode::CONFLICT,
            StoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateKey {
                constraint: db.constraint().unwrap_or("unknown").to_owned(),
            },
            // A broken reference on insert is a caller mistake, not an
            // unavailable store.
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::InvalidArgument(format!(
                    "referenced row does not exist: {}",
                    db.constraint().unwrap_or("unknown")
                ))
            }
            _ => StoreError::Unavailable(err),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error = %self, "store operation failed");
        }
        let details = match &self {
            StoreError::Unavailable(e) => Some(json!({ "db_error": e.to_string() })),
            _ => None,
        };
        ApiResponse::<()>::error(status, self.to_string(), details).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(
            StoreError::not_found("user", "u1").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StoreError::DuplicateKey {
                constraint: "users_corporate_id_key".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            StoreError::InvalidArgument("title is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::InvalidTransition {
                current: RequestStatus::Approved
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            StoreError::Unavailable(sqlx::Error::PoolClosed).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn messages_name_the_key_attempted() {
        let err = StoreError::not_found("request", "7d5c");
        assert_eq!(err.to_string(), "request not found: 7d5c");
    }
}
