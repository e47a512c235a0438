use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

impl From<sqlx::Error> for StatsError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(format!("Query execution failed: {}", err))
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[derive(Error, Debug)]
pub enum StatsError {
    /// No qualifying data for the requested metric. Not a failure.
    #[error("{0}")]
    NotFound(String),

    /// Request parameter rejected before any query ran.
    #[error("{0}")]
    InvalidParameter(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body shared by every failure response.
#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::Database(msg) | Self::Internal(msg) => {
                tracing::error!("request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = StatsError::NotFound("no data".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = StatsError::InvalidParameter("months out of range".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = StatsError::Database("connection refused".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
