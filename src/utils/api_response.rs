use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Envelope shared by every endpoint. Success and failure carry the same
/// outer shape so clients parse one structure either way.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn error(
        status: StatusCode,
        message: impl Into<String>,
        errors: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now(),
            data: None,
            errors,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_omits_the_errors_field() {
        let body = serde_json::to_value(ApiResponse::success(StatusCode::OK, "ok", 7)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["status_code"], 200);
        assert_eq!(body["data"], 7);
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn error_omits_the_data_field() {
        let body = serde_json::to_value(ApiResponse::<()>::error(
            StatusCode::NOT_FOUND,
            "user not found: u1",
            None,
        ))
        .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["status_code"], 404);
        assert!(body.get("data").is_none());
    }
}
