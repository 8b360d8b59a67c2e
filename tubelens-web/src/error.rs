//! API error envelope.
//!
//! Every failure surfaces as `{"error":{"code","message"}}` with a
//! matching status code. All errors are terminal for the triggering
//! action; nothing here retries.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tubelens_analyst::AnalystError;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Please provide your OpenAI API key first.")]
    MissingCredential,

    #[error("Please enter a valid YouTube video URL.")]
    BlankUrl,

    #[error("Unknown session. Reload the page to start a new one.")]
    UnknownSession,

    #[error("No report has been generated in this session yet.")]
    ReportNotFound,

    #[error("The analysis service failed: {0}")]
    ExternalService(String),

    #[error("The analysis service returned an empty report.")]
    EmptyResult,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingCredential => "missing_credential",
            ApiError::BlankUrl => "blank_url",
            ApiError::UnknownSession => "unknown_session",
            ApiError::ReportNotFound => "report_not_found",
            ApiError::ExternalService(_) => "external_service",
            ApiError::EmptyResult => "empty_result",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential | ApiError::BlankUrl => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnknownSession | ApiError::ReportNotFound => StatusCode::NOT_FOUND,
            ApiError::ExternalService(_) | ApiError::EmptyResult => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<AnalystError> for ApiError {
    fn from(e: AnalystError) -> Self {
        match e {
            AnalystError::ExternalService(msg) => ApiError::ExternalService(msg),
            AnalystError::EmptyResult => ApiError::EmptyResult,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": { "code": self.code(), "message": self.to_string() }
        });
        (self.status(), Json(body)).into_response()
    }
}
