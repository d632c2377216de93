use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::transport::PaymentChallenge;

/// Why a request failed.
///
/// `PaymentRequired` is always recoverable by resubmitting with a valid
/// proof. `Infrastructure` means the settlement oracle call itself
/// failed; the client's remedy is to retry later, not to obtain a new
/// proof, so it maps to a 5xx rather than another 402.
#[derive(Debug, thiserror::Error)]
pub enum UnlockError {
    #[error("{}", .0.message)]
    PaymentRequired(Box<PaymentChallenge>),

    #[error("Content {0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Payment processing error: {0}")]
    Infrastructure(String),
}

impl IntoResponse for UnlockError {
    fn into_response(self) -> Response {
        match self {
            UnlockError::PaymentRequired(challenge) => {
                (StatusCode::PAYMENT_REQUIRED, Json(*challenge)).into_response()
            }
            UnlockError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "statusCode": 404,
                    "message": format!("Content {id} not found"),
                })),
            )
                .into_response(),
            UnlockError::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "statusCode": 400,
                    "message": message,
                })),
            )
                .into_response(),
            UnlockError::Infrastructure(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "statusCode": 500,
                    "message": "Payment processing error",
                    "error": detail,
                })),
            )
                .into_response(),
        }
    }
}
