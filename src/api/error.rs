use crate::service::ScoreError;
use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Contract address required")]
    MissingAddress,

    #[error("Invalid contract address format")]
    InvalidAddress,

    #[error("Model not trained")]
    ModelNotLoaded,

    #[error("{0}")]
    Scoring(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingAddress | ApiError::InvalidAddress => StatusCode::BAD_REQUEST,
            ApiError::ModelNotLoaded | ApiError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingParameter(_) => ApiError::MissingAddress,
            ValidationError::InvalidEthereumAddress(_) => ApiError::InvalidAddress,
        }
    }
}

// Any scoring failure is surfaced with its underlying message; the serving
// process itself never dies on a request.
impl From<ScoreError> for ApiError {
    fn from(err: ScoreError) -> Self {
        ApiError::Scoring(err.to_string())
    }
}
