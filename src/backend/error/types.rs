/**
 * Backend Error Types
 *
 * `BackendError` is what handlers return. A failed board operation is wrapped
 * together with a short context message ("Failed to add group"); the full
 * error is logged when the wrapper is built, while the HTTP body only carries
 * the context message and the status code.
 *
 * # Status Code Mapping
 *
 * | BoardError       | Status |
 * |------------------|--------|
 * | `NotFound`       | 404    |
 * | `InvalidParent`  | 404    |
 * | `ImmutableField` | 422    |
 * | `Validation`     | 400    |
 * | `Conflict`       | 409    |
 * | `Storage`        | 500    |
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::error::BoardError;

#[derive(Debug, Error)]
pub enum BackendError {
    /// A board operation failed.
    #[error("{context}: {source}")]
    OperationError {
        /// Message returned to the client
        context: String,
        source: BoardError,
    },

    /// Handler error (e.g., missing identity headers)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },
}

impl BackendError {
    /// Wrap a failed operation and log it.
    pub fn operation(context: impl Into<String>, source: BoardError) -> Self {
        let context = context.into();
        match &source {
            BoardError::Storage(_) => tracing::error!("[Board] {}: {}", context, source),
            BoardError::Conflict { .. } => tracing::warn!("[Board] {}: {}", context, source),
            _ => tracing::info!("[Board] {}: {}", context, source),
        }
        Self::OperationError { context, source }
    }

    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::OperationError { source, .. } => status_for(source),
            Self::HandlerError { status, .. } => *status,
        }
    }

    /// Get the error message sent to clients
    pub fn message(&self) -> String {
        match self {
            Self::OperationError { context, .. } => context.clone(),
            Self::HandlerError { message, .. } => message.clone(),
        }
    }
}

pub fn status_for(error: &BoardError) -> StatusCode {
    match error {
        BoardError::NotFound { .. } | BoardError::InvalidParent { .. } => StatusCode::NOT_FOUND,
        BoardError::ImmutableField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BoardError::Validation { .. } => StatusCode::BAD_REQUEST,
        BoardError::Conflict { .. } => StatusCode::CONFLICT,
        BoardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
