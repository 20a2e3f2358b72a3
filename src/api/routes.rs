use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::dto::{
    AuditQuery, AuditResponse, BalanceResponse, LoginRequest, LoginResponse,
    SubmitTransferRequest, SubmitTransferResponse, TransferListResponse, TransferStatusResponse,
};
use super::errors::error_response;
use super::{Principal, SharedService};

pub async fn health(State(service): State<SharedService>) -> Response {
    match service.health().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn login(
    State(service): State<SharedService>,
    Json(body): Json<LoginRequest>,
) -> Response {
    match service.login(&body.username, &body.password).await {
        Ok(token) => (StatusCode::OK, Json(LoginResponse { ok: true, token })).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn get_balance(
    State(service): State<SharedService>,
    Extension(principal): Extension<Principal>,
) -> Response {
    match service.get_balance(&principal.0).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(BalanceResponse {
                ok: true,
                user: principal.0,
                balance,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn submit_transfer(
    State(service): State<SharedService>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<SubmitTransferRequest>,
) -> Response {
    match service
        .submit_transfer(&principal.0, &body.recipient, &body.amount, &body.reference)
        .await
    {
        Ok(receipt) => (
            StatusCode::OK,
            Json(SubmitTransferResponse {
                ok: true,
                transfer_id: receipt.transfer_id,
                status: receipt.status,
                fee: receipt.fee,
                sender_new_balance: receipt.sender_balance,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn get_transfer_status(
    State(service): State<SharedService>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Response {
    match service.get_transfer_status(&principal.0, &id).await {
        Ok(transfer) => (
            StatusCode::OK,
            Json(TransferStatusResponse { ok: true, transfer }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn list_transfers(
    State(service): State<SharedService>,
    Extension(principal): Extension<Principal>,
) -> Response {
    match service.list_transfers(&principal.0).await {
        Ok(transfers) => (
            StatusCode::OK,
            Json(TransferListResponse {
                ok: true,
                transfers,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn audit_trail(
    State(service): State<SharedService>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<AuditQuery>,
) -> Response {
    match service.audit_trail(query.limit).await {
        Ok(entries) => (StatusCode::OK, Json(AuditResponse { ok: true, entries })).into_response(),
        Err(err) => error_response(err),
    }
}
