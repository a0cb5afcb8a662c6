//! HTTP-facing error type.
//!
//! Every failure is rendered as `{"detail": "<message>"}`. Validation
//! problems are client errors (400); engine and artifact failures are server
//! errors (500). Bodies axum cannot decode keep the status axum assigns.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::core::synthesis::{SynthesisError, ValidationError};

pub type AppResult<T> = Result<T, AppError>;

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    /// Human readable error message
    #[cfg_attr(
        feature = "openapi",
        schema(example = "Voice 'nonexistent' not available. Use /v1/voices to see available voices.")
    )]
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    MalformedRequest { status: StatusCode, message: String },

    #[error("Error generating speech: {0}")]
    Synthesis(#[from] SynthesisError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MalformedRequest { status, .. } => *status,
            Self::Synthesis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), %detail, "Request failed");
        } else {
            warn!(status = status.as_u16(), %detail, "Request rejected");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}
