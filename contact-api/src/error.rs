use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use message_store::StoreError;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid or expired session token")]
    Unauthorized,

    #[error("No messages file found")]
    NoStoreFile,

    #[error("Failed to read messages")]
    ReadFailed(#[source] StoreError),

    #[error("Failed to delete message")]
    DeleteFailed(#[source] StoreError),
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = match &self {
            ContactError::MissingFields => StatusCode::BAD_REQUEST,
            ContactError::Unauthorized => StatusCode::UNAUTHORIZED,
            ContactError::NoStoreFile => StatusCode::NOT_FOUND,
            ContactError::ReadFailed(_) | ContactError::DeleteFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            match &self {
                ContactError::ReadFailed(e) | ContactError::DeleteFailed(e) => {
                    tracing::error!("{}: {}", self, e);
                }
                _ => {}
            }
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
