use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use karta_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `karta_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} {key} not found"),
                ),
                CoreError::MissingAsset { asset, path } => {
                    tracing::error!(asset, path = %path, "missing asset");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "MISSING_ASSET",
                        format!("Required asset '{asset}' is not available"),
                    )
                }
                CoreError::Storage { location, detail } => {
                    tracing::error!(%location, detail = %detail, "store write failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        format!("Card could not be written to the {location} store"),
                    )
                }
                CoreError::Ledger(msg) => {
                    tracing::error!(error = %msg, "ledger error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "LEDGER_ERROR",
                        "The card ledger could not be updated".to_string(),
                    )
                }
                CoreError::Image(msg) => {
                    tracing::error!(error = %msg, "image processing error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "IMAGE_ERROR",
                        "Card image processing failed".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
