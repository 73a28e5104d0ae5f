use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// The `Display` text is what callers see in the `error` field of the JSON
/// body, so every variant carries a complete message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Request used a method the endpoint does not accept.
    MethodNotAllowed,
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Fetching the source document failed (transport or non-2xx status).
    Fetch(String),
    /// The fetched document was not valid JSON.
    InvalidJson(String),
    /// The document is missing required content.
    Validation(String),
    /// The table store rejected an insert.
    Store(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MethodNotAllowed => write!(f, "Only POST requests allowed"),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            AppError::InvalidJson(msg) => write!(f, "Invalid JSON response: {}", msg),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::Store(msg) => write!(f, "Store insertion error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(_)
            | AppError::InvalidJson(_)
            | AppError::Validation(_)
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Server-side failures are logged here, in one place, before the
    /// message is returned to the caller.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Webhook error: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl From<crate::db_storage::StoreError> for AppError {
    fn from(err: crate::db_storage::StoreError) -> Self {
        AppError::Store(err.message)
    }
}
