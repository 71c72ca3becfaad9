use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{PersistenceError, QueryError, WriteError};
use serde_json::json;
use thiserror::Error;
use types::ValidationError;

/// Every way a request can fail. Each variant becomes a JSON body with at
/// least a `message` field.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid game data: {0}")]
    Body(#[from] JsonRejection),

    #[error("Invalid query parameters: {0}")]
    QueryString(#[from] QueryRejection),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<WriteError> for ApiError {
    fn from(error: WriteError) -> Self {
        match error {
            WriteError::Validation(error) => Self::Validation(error),
            WriteError::Persistence(error) => Self::Persistence(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(error) => {
                (StatusCode::BAD_REQUEST, json!({ "message": error.to_string() }))
            }
            ApiError::Body(rejection) => {
                tracing::debug!(%rejection, "rejected save payload");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": "Invalid game data", "error": rejection.body_text() }),
                )
            }
            ApiError::QueryString(rejection) => {
                tracing::debug!(%rejection, "rejected history query");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": "Invalid query parameters", "error": rejection.body_text() }),
                )
            }
            ApiError::Persistence(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": error.message(), "error": error.detail().to_string() }),
            ),
            ApiError::Query(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "message": error.message(),
                    "error": error.detail().to_string(),
                    "count": 0,
                    "data": [],
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
