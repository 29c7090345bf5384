use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use biblia_core::envelope::ApiResponse;
use biblia_domain::ValidationError;

/// Tracker service error variants.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    BadRequest(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Record not found for the specified user and ISBN")]
    RecordNotFound,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("A record for this user and ISBN already exists")]
    RecordAlreadyExists,
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// Carries the hasher's failure for the log; never sent to clients.
    #[error("failed to process password")]
    Hashing(String),
    #[error("internal error")]
    Storage(#[from] anyhow::Error),
}

impl TrackerError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::RecordAlreadyExists => "RECORD_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Hashing(_) => "HASHING",
            Self::Storage(_) => "STORAGE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UserNotFound | Self::RecordNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken | Self::RecordAlreadyExists => StatusCode::CONFLICT,
            Self::Hashing(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage(e) => {
                tracing::error!(error = ?e, kind = self.kind(), "internal error");
            }
            Self::Hashing(cause) => {
                tracing::error!(error = %cause, kind = self.kind(), "password hashing failed");
            }
            _ => {}
        }
        ApiResponse::failure(self.status(), self.to_string()).into_response()
    }
}

impl From<JsonRejection> for TrackerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for TrackerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(format!("Invalid query: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for TrackerError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(format!("Invalid path: {}", rejection.body_text()))
    }
}
