use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use propertypros_db::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Request failure. Only the kind reaches the client; store detail is logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized access")]
    Unauthorized,

    #[error("forbidden access")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} was not modified")]
    UpdateFailed(&'static str),

    #[error("{0}")]
    BadRequest(String),

    /// Body, path or query string failed to decode. Keeps axum's status.
    #[error("{1}")]
    Rejected(StatusCode, String),

    #[error("store failure: {0}")]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing(param: &str) -> Self {
        Self::BadRequest(format!("missing required query parameter: {}", param))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::UpdateFailed(what) => Self::UpdateFailed(what),
            StoreError::Forbidden(what) => {
                warn!("Store refused write: {} not permitted", what);
                Self::Forbidden
            }
            other => Self::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => {
                warn!("Rejected request: {}", self);
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => {
                warn!("Rejected request: {}", self);
                StatusCode::FORBIDDEN
            }
            Self::NotFound(_) => {
                info!("{}", self);
                StatusCode::NOT_FOUND
            }
            Self::UpdateFailed(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(status, _) => {
                debug!("Rejected input: {}", self);
                *status
            }
            Self::Store(_) | Self::Internal(_) => {
                error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            Self::Store(_) | Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        (
            status,
            Json(json!({ "message": message, "status": status.as_u16() })),
        )
            .into_response()
    }
}

/// Treats an absent or empty query value as missing.
pub fn required(value: Option<String>, param: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing(param))
}
