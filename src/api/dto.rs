//! Request/response shapes for the RPC surface. Success and failure bodies
//! are distinct types carrying only the fields valid for that variant; all
//! monetary fields travel as decimal text.

use serde::{Deserialize, Serialize};

use crate::domain::{AuditEntry, Money, TransferId, TransferRecord, TransferStatus};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub ok: bool,
    pub user: String,
    pub balance: Money,
}

#[derive(Debug, Deserialize)]
pub struct SubmitTransferRequest {
    pub recipient: String,
    /// Decimal text; parsed and quantized server-side.
    pub amount: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitTransferResponse {
    pub ok: bool,
    pub transfer_id: TransferId,
    pub status: TransferStatus,
    pub fee: Money,
    pub sender_new_balance: Money,
}

#[derive(Debug, Serialize)]
pub struct TransferStatusResponse {
    pub ok: bool,
    pub transfer: TransferRecord,
}

#[derive(Debug, Serialize)]
pub struct TransferListResponse {
    pub ok: bool,
    pub transfers: Vec<TransferRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
}

fn default_audit_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub ok: bool,
    pub entries: Vec<AuditEntry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    /// Present exactly when a FAILED transfer record was persisted and can
    /// be looked up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<TransferId>,
}
