use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// The recommendation pipeline distinguishes "try again shortly" failures
/// (`RateLimited`, `UpstreamUnavailable`) from "this input produced nothing
/// usable" outcomes (`NoSuggestions`, `NoMatchesFound`).
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generative service rate limited: {0}")]
    RateLimited(String),

    #[error("Generative service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Generative service returned an unparsable payload: {0}")]
    MalformedUpstreamResponse(String),

    #[error("Generative service returned no usable suggestions")]
    NoSuggestions,

    #[error("No suggested title could be matched in the catalog")]
    NoMatchesFound,

    #[error("Catalog service error: {0}")]
    Catalog(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::UpstreamUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::MalformedUpstreamResponse(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::NoSuggestions | AppError::NoMatchesFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Catalog(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
