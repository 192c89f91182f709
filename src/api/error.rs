use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use thiserror::Error;

use crate::resource::FieldError;
use crate::store::StoreError;

use super::types::{ErrorResponse, UnauthorizedResponse};

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";
const SERVER_ERROR_MESSAGE: &str = "server error";

/// API errors with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] FieldError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized request")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized => {
                let body = UnauthorizedResponse {
                    error: UNAUTHORIZED_MESSAGE,
                };
                return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
            }
            ApiError::Store(err) => {
                error!("{err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from(SERVER_ERROR_MESSAGE),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
