use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of every message-only response, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Client errors reported by handlers as a status plus a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    NotFound(&'static str),
    BadRequest(String),
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MockError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            MockError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(MessageResponse::new(message))).into_response()
    }
}
