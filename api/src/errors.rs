use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::upstream::UpstreamError;

/// Failures inside the fetch/aggregate pipeline.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),

    /// Carries the message shown to the client; the cause is only logged.
    #[error("{message}: {source}")]
    Failed {
        message: String,
        #[source]
        source: ServiceError,
    },
}

impl ApiError {
    /// For `map_err`: wraps a pipeline failure under a client-facing message.
    pub fn failed<E>(message: impl Into<String>) -> impl FnOnce(E) -> ApiError
    where
        E: Into<ServiceError>,
    {
        let message = message.into();
        move |source| ApiError::Failed {
            message,
            source: source.into(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ValidationError(rejection.body_text())
    }
}

/// Convert our custom errors to HTTP responses
///
/// Upstream and authentication problems all surface as a generic 500;
/// the detailed cause goes to the log.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Failed { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}
