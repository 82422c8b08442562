use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Failed to process image: {0}")]
    ProcessingError(String),

    #[error("Preprocessing failed: {0}")]
    PreprocessingError(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid filter rules: {0}")]
    InvalidFilterRules(String),

    #[error("Translation is not configured")]
    TranslationDisabled,

    #[error("Translation failed: {0}")]
    TranslationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl MenuError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            MenuError::InitializationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INIT_ERROR"),
            MenuError::ProcessingError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR"),
            MenuError::PreprocessingError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PREPROCESSING_ERROR")
            }
            MenuError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT"),
            MenuError::ImageTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE"),
            MenuError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            MenuError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            MenuError::InvalidFilterRules(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_FILTER_RULES")
            }
            MenuError::TranslationDisabled => (StatusCode::BAD_REQUEST, "TRANSLATION_DISABLED"),
            MenuError::TranslationError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TRANSLATION_ERROR")
            }
            MenuError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for MenuError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        let (status, code) = MenuError::InvalidRequest("query is required".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_REQUEST");

        let (status, _) = MenuError::MissingFile.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_failures_are_server_errors() {
        let (status, code) = MenuError::TranslationError("quota".into()).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "TRANSLATION_ERROR");

        let (status, _) = MenuError::ProcessingError("bad image".into()).status_and_code();
        assert!(status.is_server_error());
    }

    #[test]
    fn test_too_large_message() {
        let err = MenuError::ImageTooLarge { size: 10, max: 5 };
        assert_eq!(err.to_string(), "Image too large: 10 bytes (max: 5 bytes)");
        assert_eq!(err.status_and_code().0, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
