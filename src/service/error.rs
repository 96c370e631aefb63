use crate::domain::booking::{ErrorEnvelope, ErrorPayload};
use crate::scoring::ScoringError;
use crate::segmentation::SegmentationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

const LOCK_NOT_AVAILABLE: &str = "55P03";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("lock not acquired: {0}")]
    LockTimeout(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Maps database failures that callers can act on; everything else
    /// stays internal.
    pub fn from_db(err: anyhow::Error, subject: &str) -> Self {
        let code = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| match e {
                sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
                _ => None,
            });

        match code.as_deref() {
            Some(LOCK_NOT_AVAILABLE) => Self::LockTimeout(subject.to_string()),
            Some(FOREIGN_KEY_VIOLATION) => Self::NotFound(subject.to_string()),
            _ => Self::Internal(err),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::LockTimeout(_) => "LOCK_TIMEOUT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Conflict(_) => "CONFLICT",
            Self::Scoring(ScoringError::ModelUnavailable(_)) => "MODEL_UNAVAILABLE",
            Self::Segmentation(SegmentationError::InvalidClusterCount(_)) => "INVALID_CLUSTER_COUNT",
            Self::Segmentation(SegmentationError::InsufficientSamples { .. }) => "INSUFFICIENT_SAMPLES",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::LockTimeout(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) | Self::Segmentation(_) => StatusCode::BAD_REQUEST,
            Self::Scoring(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_http(self) -> (StatusCode, ErrorEnvelope) {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "request failed: {:#}", self);
        }
        (
            status,
            ErrorEnvelope {
                error: ErrorPayload {
                    code: self.code().to_string(),
                    message: self.to_string(),
                    details: None,
                },
            },
        )
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_http();
        (status, Json(body)).into_response()
    }
}
