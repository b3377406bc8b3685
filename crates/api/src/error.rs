use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lendly_core::error::CoreError;
use lendly_payments::PaymentError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`PaymentError`] for
/// collaborator failures, and implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `lendly_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A payment collaborator failure.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

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
        // RangeUnavailable carries the conflicting dates so the caller
        // can suggest alternatives; it gets an extended body.
        if let AppError::Core(CoreError::RangeUnavailable { dates }) = &self {
            let body = json!({
                "error": self.to_string(),
                "code": "RANGE_UNAVAILABLE",
                "unavailable_dates": dates,
            });
            return (StatusCode::CONFLICT, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::ConflictingSlot(msg) => {
                    (StatusCode::BAD_REQUEST, "CONFLICTING_SLOTS", msg.clone())
                }
                CoreError::NoApplicableRate { .. } => (
                    StatusCode::BAD_REQUEST,
                    "NO_APPLICABLE_RATE",
                    core.to_string(),
                ),
                CoreError::RangeUnavailable { .. } => unreachable!("handled above"),
                CoreError::InvalidState { .. } => {
                    (StatusCode::CONFLICT, "INVALID_STATE", core.to_string())
                }
                CoreError::UnauthorizedActor(msg) => {
                    (StatusCode::FORBIDDEN, "UNAUTHORIZED_ACTOR", msg.clone())
                }
            },

            // --- Payment collaborator failures ---
            AppError::Payment(payment) => {
                tracing::error!(error = %payment, "Payment collaborator failure");
                let code = match payment {
                    PaymentError::HoldFailed(_) => "HOLD_FAILED",
                    PaymentError::CaptureFailed(_) => "CAPTURE_FAILED",
                    PaymentError::CancelFailed(_) => "CANCEL_FAILED",
                };
                (StatusCode::BAD_GATEWAY, code, payment.to_string())
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
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

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Check/unique constraint violations map to 400/409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL: 23505 unique violation, 23514 check violation.
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    )
                }
                Some("23514") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    )
                }
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
