use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Database(#[from] database::DbError),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to read PDF: {0}")]
    Pdf(String),
    #[error("{0}")]
    Internal(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Every error leaves the server as `{"error": "<message>"}`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(message) => {
                tracing::warn!(%message, "Not found.");
                StatusCode::NOT_FOUND
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Pdf(message) | AppError::Internal(message) => {
                tracing::error!(%message, "Internal error.");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_response(status, self.to_string())
    }
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(json!({ "error": message.into() }));
    (status, body).into_response()
}

/// Response for a handler that panicked, used by `CatchPanicLayer`.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!(%message, "Handler panicked.");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_maps_to_404_with_its_message() {
        let response = AppError::NotFound("Book not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "Book not found" }));
    }

    #[tokio::test]
    async fn database_errors_map_to_500_exposing_the_message() {
        let response = AppError::Database(database::DbError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": database::DbError::NotFound.to_string() })
        );
    }

    #[tokio::test]
    async fn pdf_errors_are_prefixed() {
        let response = AppError::Pdf("invalid file header".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to read PDF: invalid file header" })
        );
    }

    #[tokio::test]
    async fn panic_payload_becomes_the_message() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "boom" }));

        let response = panic_response(Box::new(format!("index {} out of range", 3)));
        assert_eq!(body_json(response).await, json!({ "error": "index 3 out of range" }));
    }
}
