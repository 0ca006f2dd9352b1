use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::betting::{BetQuoteError, PlacementError};
use crate::services::bet_placement::PlaceBetError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<BetQuoteError> for AppError {
    fn from(e: BetQuoteError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<PlacementError> for AppError {
    fn from(e: PlacementError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<PlaceBetError> for AppError {
    fn from(e: PlaceBetError) -> Self {
        match e {
            PlaceBetError::EventNotFound(_) | PlaceBetError::UserNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            PlaceBetError::Rejected(reason) => reason.into(),
            PlaceBetError::Backend(inner) => AppError::Internal(inner),
        }
    }
}
