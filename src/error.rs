use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use crate::ai::agents::ResponsePayload;

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("{0}")]
    Validation(String),

    #[error("Missing template variable: {0}")]
    MissingVariable(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("API Error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Remote(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoachError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoachError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Template errors mean a catalog row is broken, not that the caller did anything wrong.
    pub fn is_defect(&self) -> bool {
        matches!(self, CoachError::MissingVariable(_) | CoachError::InvalidTemplate(_))
    }
}

impl IntoResponse for CoachError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = ResponsePayload::Error { error: self.to_string() };
        (status, Json(payload)).into_response()
    }
}
