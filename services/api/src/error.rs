//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use hiring_assistant_core::{PortError, SessionError};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A session operation was rejected or its collaborator failed.
    #[error("Session Error: {0}")]
    Session(#[from] SessionError),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    /// The request payload was well-formed JSON but semantically invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The JSON body returned for every failed request.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::InvalidTransition(_)) => StatusCode::CONFLICT,
            ApiError::Session(SessionError::GenerationFailure(PortError::Timeout(_)))
            | ApiError::Session(SessionError::FollowUpFailure(PortError::Timeout(_))) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ApiError::Session(_) => StatusCode::BAD_GATEWAY,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
