use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag describing what a ledger mutation (or authentication event) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOperation {
    UserCreated,
    LoginSuccess,
    LoginFailed,
    TransferCreated,
    BalanceUpdated,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOperation::UserCreated => "USER_CREATED",
            AuditOperation::LoginSuccess => "LOGIN_SUCCESS",
            AuditOperation::LoginFailed => "LOGIN_FAILED",
            AuditOperation::TransferCreated => "TRANSFER_CREATED",
            AuditOperation::BalanceUpdated => "BALANCE_UPDATED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "USER_CREATED" => Some(AuditOperation::UserCreated),
            "LOGIN_SUCCESS" => Some(AuditOperation::LoginSuccess),
            "LOGIN_FAILED" => Some(AuditOperation::LoginFailed),
            "TRANSFER_CREATED" => Some(AuditOperation::TransferCreated),
            "BALANCE_UPDATED" => Some(AuditOperation::BalanceUpdated),
            _ => None,
        }
    }
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit trail entry. Entries documenting a balance mutation are
/// written in the same atomic unit as the mutation itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub operation: AuditOperation,
    pub principal: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}
