use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Guidance shown whenever a request fails for reasons the caller can only
/// work around by changing its input.
const RETRY_GUIDANCE: &str =
    "Please try again with a different PDF file or check the job description format.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The uploaded document yielded no text. Terminal; no LLM call is made.
    #[error("No content could be extracted from the resume")]
    ExtractionEmpty,

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// The request outlived `REQUEST_TIMEOUT_SECS` and was cancelled.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ExtractionEmpty => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_EMPTY",
                "Could not extract text from the uploaded resume.".to_string(),
            ),
            AppError::Extraction(msg) => {
                tracing::warn!("Extraction error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    format!("The uploaded resume could not be read. {RETRY_GUIDANCE}"),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    format!("An AI processing error occurred. {RETRY_GUIDANCE}"),
                )
            }
            AppError::Timeout(secs) => {
                tracing::warn!("Request cancelled after {secs}s");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "REQUEST_TIMEOUT",
                    format!("The request took longer than {secs} seconds. {RETRY_GUIDANCE}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_extraction_empty_is_unprocessable() {
        let response = AppError::ExtractionEmpty.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EXTRACTION_EMPTY");
    }

    #[tokio::test]
    async fn test_llm_error_hides_upstream_detail() {
        let response = AppError::Llm("quota exceeded for key sk-123".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(!message.contains("sk-123"));
        assert!(message.contains("try again"));
    }

    #[tokio::test]
    async fn test_timeout_renders_json_body() {
        let response = AppError::Timeout(420).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "REQUEST_TIMEOUT");
        assert!(body["error"]["message"].as_str().unwrap().contains("420"));
    }

    #[tokio::test]
    async fn test_validation_error_echoes_message() {
        let response =
            AppError::Validation("job_description cannot be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "job_description cannot be empty");
    }
}
