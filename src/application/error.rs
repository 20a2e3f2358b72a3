use thiserror::Error;

use crate::domain::TransferId;

/// Error taxonomy of the orchestration tier. Validation errors are detected
/// before any ledger interaction and persist nothing; insufficient funds is
/// a real attempted transfer that leaves a FAILED record behind.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid recipient account")]
    InvalidRecipient,

    #[error("Recipient cannot be the sender")]
    SelfTransfer,

    #[error("{0}")]
    InvalidAmount(String),

    #[error("Insufficient funds")]
    InsufficientFunds { transfer_id: TransferId },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Transfer not found: {0}")]
    TransferNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    /// The transactional unit aborted; nothing was committed and the request
    /// is safe to retry.
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
