//! Error handling for the Rookery API
//!
//! This module provides a unified error type using thiserror, with HTTP
//! status mapping via Axum's IntoResponse trait and conversion into GraphQL
//! field errors that carry a machine-readable `extensions.code`.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repositories::RepositoryError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists (conflict)
    #[error("{resource_type} already exists: {reason}")]
    Conflict {
        resource_type: &'static str,
        reason: String,
    },

    // ========== Validation Errors ==========
    /// Input failed validation, including references to missing rows
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Query nested deeper than the configured limit
    #[error("'{operation}' exceeds maximum operation depth of {max_depth}")]
    QueryTooDeep { operation: String, max_depth: usize },

    // ========== Database Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(Arc<sqlx::Error>),

    /// Storage could not be reached
    #[error("database connection unavailable")]
    DatabaseUnavailable,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Conflict { .. } => StatusCode::CONFLICT,

            // 400 Bad Request
            Self::ValidationError(_) | Self::QueryTooDeep { .. } => StatusCode::BAD_REQUEST,

            // 503 Service Unavailable
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::QueryTooDeep { .. } => "QUERY_TOO_DEEP",
            Self::Database(_) => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Message safe to show a GraphQL client
    ///
    /// Server-side failures are reported generically; the detail goes to the
    /// log instead.
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) => "An unexpected error occurred".to_string(),
            Self::DatabaseUnavailable => "Storage is temporarily unavailable".to_string(),
            other => other.to_string(),
        }
    }

    /// Log and convert into a GraphQL field error
    pub fn into_graphql(self) -> async_graphql::Error {
        self.log();
        self.extend()
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.public_message())
            .extend_with(|_, e| e.set("code", self.error_code()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => Self::NotFound {
                resource_type: entity,
                id,
            },
            RepositoryError::Conflict { entity, reason } => Self::Conflict {
                resource_type: entity,
                reason,
            },
            RepositoryError::InvalidReference { entity, reason } => {
                Self::ValidationError(format!("invalid {} reference: {}", entity, reason))
            }
            RepositoryError::Unavailable(reason) => {
                tracing::warn!(%reason, "storage unavailable");
                Self::DatabaseUnavailable
            }
            RepositoryError::Database(err) => Self::Database(err),
        }
    }
}
