use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum QuoteError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Imported payload is not a JSON array")]
    ImportNotASequence,

    #[error("Remote source responded with status: {0}")]
    RemoteStatus(StatusCode),

    #[error("Ractor error: {0}")]
    RactorError(String),
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            QuoteError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg,
                },
            ),
            QuoteError::Json(_) | QuoteError::ImportNotASequence => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "INVALID_IMPORT".to_string(),
                    message: "Invalid JSON file.".to_string(),
                },
            ),
            QuoteError::Reqwest(_) | QuoteError::UrlParse(_) | QuoteError::RemoteStatus(_) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "BAD_GATEWAY".to_string(),
                    message: "Remote quote source is unavailable.".to_string(),
                },
            ),
            QuoteError::DatabaseError(_)
            | QuoteError::Io(_)
            | QuoteError::Config(_)
            | QuoteError::RactorError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
