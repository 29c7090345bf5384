//! Uniform JSON response envelope.
//!
//! Every endpoint answers with `{success, message?, data?, error?}`; absent
//! fields are omitted from the body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Success without a payload (e.g. after a delete).
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// An envelope paired with the status code it is sent with.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope::ok(data, message),
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: Envelope::ok(data, message),
        }
    }
}

impl ApiResponse<()> {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope::done(message),
        }
    }

    pub fn failure(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: Envelope::failure(error),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
