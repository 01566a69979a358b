//! Error responses of the HTTP API.
//!
//! Food endpoint failures map to a status code and a `{ "error": … }` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::errors::Error;

/// Failures of the food proxy endpoints, rendered as `{ "error": … }`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required query parameter was absent or blank
    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    /// The food database has no such product
    #[error("Product not found")]
    NotFound,

    /// Anything else; carries the raw error text
    #[error("{0}")]
    Upstream(String),
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::FoodNotFound => Self::NotFound,
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
