use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::AppError;

use super::dto::ErrorResponse;

/// Map an application error onto a `{ok:false, error, ...}` body and an HTTP
/// status. Insufficient funds carries the id of the persisted FAILED record;
/// storage internals are never leaked to the client.
pub fn error_response(err: AppError) -> Response {
    let (status, message, transfer_id) = match &err {
        AppError::InvalidRecipient | AppError::SelfTransfer | AppError::InvalidAmount(_) => {
            (StatusCode::BAD_REQUEST, err.to_string(), None)
        }
        AppError::InsufficientFunds { transfer_id } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Insufficient funds".to_string(),
            Some(*transfer_id),
        ),
        AppError::AccountNotFound(_) | AppError::TransferNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string(), None)
        }
        AppError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "Invalid credentials".to_string(),
            None,
        ),
        AppError::Unauthorized => return unauthorized(),
        AppError::Storage(inner) => {
            tracing::error!(error = %inner, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage failure, request not applied".to_string(),
                None,
            )
        }
    };

    (
        status,
        Json(ErrorResponse {
            ok: false,
            error: message,
            transfer_id,
        }),
    )
        .into_response()
}

/// Uniform 401 for every authentication failure. Deliberately identical for
/// missing, malformed, unknown and expired tokens.
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            ok: false,
            error: "Unauthorized".to_string(),
            transfer_id: None,
        }),
    )
        .into_response()
}
