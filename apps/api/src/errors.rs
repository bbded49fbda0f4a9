use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// The wire shape is `{"error": <string>, "details": <any>}` with a non-2xx status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("completion error: {0}")]
    Llm(#[from] LlmError),

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "invalid request body", json!(msg))
            }
            AppError::Llm(err) => {
                tracing::error!("completion call failed: {err}");
                match err {
                    LlmError::Api { status, body } => (
                        StatusCode::BAD_GATEWAY,
                        "API response error",
                        json!({ "status": status, "body": body }),
                    ),
                    LlmError::MalformedResponse { body } => {
                        (StatusCode::BAD_GATEWAY, "API response error", body.clone())
                    }
                    LlmError::Http(e) => (
                        StatusCode::BAD_GATEWAY,
                        "API call failed",
                        json!(e.to_string()),
                    ),
                }
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error",
                    json!(null),
                )
            }
        };

        let body = Json(json!({
            "error": error,
            "details": details
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_upstream_response_maps_to_502() {
        let err = AppError::Llm(LlmError::MalformedResponse {
            body: json!({"unexpected": true}),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "API response error");
        assert_eq!(body["details"]["unexpected"], true);
    }

    #[tokio::test]
    async fn test_upstream_error_status_maps_to_502_with_details() {
        let err = AppError::Llm(LlmError::Api {
            status: 429,
            body: json!({"error": {"message": "rate limited"}}),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "API response error");
        assert_eq!(body["details"]["status"], 429);
        assert_eq!(body["details"]["body"]["error"]["message"], "rate limited");
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let err = AppError::Validation("hazard must be a string".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "invalid request body");
        assert_eq!(body["details"], "hazard must be a string");
    }

    #[tokio::test]
    async fn test_internal_error_maps_to_500() {
        let err = AppError::Internal(anyhow::anyhow!("boom"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
