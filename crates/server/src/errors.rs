use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::{ErrorKind, ServiceError};
use thiserror::Error;

/// JSON error envelope: `{"status": 404, "error": "not found", "detail": ..}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
        Self { status, title: title.to_string(), detail }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found", None)
    }

    /// Map a service error; `storage_title` is used for 500s.
    pub fn from_service(e: ServiceError, storage_title: &str) -> Self {
        match e.kind() {
            ErrorKind::InvalidInput => Self::new(StatusCode::BAD_REQUEST, "bad request", Some(e.to_string())),
            ErrorKind::StorageFailure => Self::new(StatusCode::INTERNAL_SERVER_ERROR, storage_title, Some(e.to_string())),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({"status": self.status.as_u16(), "error": self.title});
        if let Some(detail) = self.detail {
            body["detail"] = serde_json::Value::String(detail);
        }
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
