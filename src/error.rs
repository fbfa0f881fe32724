//! Error types for the PDF to Markdown server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::convert::ConversionError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected before any processing starts
    #[error("{0}")]
    InvalidInput(String),

    #[error("Field required: file")]
    MissingFile,

    #[error("Error processing PDF: {0}")]
    Processing(#[from] ConversionError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: Detail,
}

/// A plain message, or a list of validation issues for 422 responses
#[derive(Serialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    kind: &'static str,
    loc: [&'static str; 2],
    msg: &'static str,
    input: Option<()>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Processing(e) => tracing::error!("PDF conversion failed: {}", e),
            _ => tracing::warn!("Rejected upload: {}", self),
        }

        let detail = match &self {
            AppError::MissingFile => Detail::Validation(vec![ValidationIssue {
                kind: "missing",
                loc: ["body", "file"],
                msg: "Field required",
                input: None,
            }]),
            _ => Detail::Message(self.to_string()),
        };

        let body = Json(ErrorResponse { detail });

        (status, body).into_response()
    }
}
