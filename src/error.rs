//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{DomainError, TransitionError};
use crate::repository::{Entity, RepositoryError};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Version conflict: subscription {subscription_id} was modified concurrently")]
    VersionConflict { subscription_id: Uuid },

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Persistence error: {0}")]
    Persistence(RepositoryError),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => AppError::NotFound { entity, id },
            RepositoryError::VersionConflict { subscription_id, .. } => {
                AppError::VersionConflict { subscription_id }
            }
            other => AppError::Persistence(other),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Domain(err.into())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::NotFound { entity, .. } => (
                StatusCode::NOT_FOUND,
                match entity {
                    Entity::User => "user_not_found",
                    Entity::Product => "product_not_found",
                    Entity::Voucher => "voucher_not_found",
                    Entity::Subscription => "subscription_not_found",
                },
            ),
            AppError::VersionConflict { .. } => (StatusCode::CONFLICT, "version_conflict"),
            AppError::Domain(domain_err) => {
                let status = match domain_err {
                    DomainError::InvalidDiscount { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    DomainError::InvalidTransition(_) => StatusCode::CONFLICT,
                    DomainError::InvalidMoney(_) | DomainError::DateOutOfRange { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, domain_err.error_code())
            }
            AppError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let details = match &self {
            AppError::InvalidRequest(msg) => Some(msg.clone()),
            AppError::NotFound { id, .. } => Some(id.clone()),
            AppError::VersionConflict { subscription_id } => Some(subscription_id.to_string()),
            AppError::Domain(DomainError::InvalidDiscount { field }) => Some(field.to_string()),
            AppError::Domain(DomainError::InvalidTransition(TransitionError::TrialInProgress {
                trial_end,
            })) => Some(trial_end.to_string()),
            AppError::Domain(_) => None,

            // 500s never leak their cause to the client
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {:?}", e);
                None
            }
        };

        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
