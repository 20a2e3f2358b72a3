use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

pub type TransferId = Uuid;

/// Lifecycle state of a transfer. `Completed` and `Failed` are terminal:
/// once a record carries one of them it is never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Completed,
    Failed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "PENDING",
            TransferStatus::Completed => "COMPLETED",
            TransferStatus::Failed => "FAILED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TransferStatus::Pending),
            "COMPLETED" => Some(TransferStatus::Completed),
            "FAILED" => Some(TransferStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Completed | TransferStatus::Failed)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attempted movement of money. Exactly one record exists per submission
/// that reached the ledger, including attempts that failed on insufficient
/// funds; only malformed requests leave no trace here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,
    pub sender: String,
    pub recipient: String,
    /// Principal credited to the recipient (always positive).
    pub amount: Money,
    /// Fee debited from the sender on top of the amount.
    pub fee: Money,
    /// Free-text client-supplied note; not validated, may be empty.
    pub reference: String,
    pub status: TransferStatus,
    /// Populated only when status is FAILED.
    pub reason: String,
    pub created_at: DateTime<Utc>,
    /// Advances whenever the status changes.
    pub updated_at: DateTime<Utc>,
}

impl TransferRecord {
    fn new(
        sender: &str,
        recipient: &str,
        amount: Money,
        fee: Money,
        reference: &str,
        status: TransferStatus,
        reason: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
            fee,
            reference: reference.to_string(),
            status,
            reason: reason.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A transfer that moved money; committed together with both balance
    /// updates.
    pub fn completed(
        sender: &str,
        recipient: &str,
        amount: Money,
        fee: Money,
        reference: &str,
    ) -> Self {
        Self::new(
            sender,
            recipient,
            amount,
            fee,
            reference,
            TransferStatus::Completed,
            "",
        )
    }

    /// A transfer that moved nothing, kept for auditability.
    pub fn failed(
        sender: &str,
        recipient: &str,
        amount: Money,
        fee: Money,
        reference: &str,
        reason: &str,
    ) -> Self {
        Self::new(
            sender,
            recipient,
            amount,
            fee,
            reference,
            TransferStatus::Failed,
            reason,
        )
    }

    /// What the sender is debited: amount plus fee.
    pub fn total_debit(&self) -> Money {
        self.amount + self.fee
    }
}
