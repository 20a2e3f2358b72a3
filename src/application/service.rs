use rust_decimal_macros::dec;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    Account, AuditEntry, FeeSchedule, Money, TransferId, TransferRecord, TransferStatus,
};
use crate::storage::{LedgerStore, TransferOutcome};

use super::{AppError, Sessions};

/// The transfer orchestrator. Stateless per request apart from resolving the
/// caller's session; every balance mutation is delegated to the ledger store
/// as a single atomic operation.
pub struct BankService {
    store: LedgerStore,
    sessions: Sessions,
    fees: FeeSchedule,
}

/// What the caller gets back from a completed transfer.
#[derive(Debug)]
pub struct TransferReceipt {
    pub transfer_id: TransferId,
    pub status: TransferStatus,
    pub fee: Money,
    pub sender_balance: Money,
}

impl BankService {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            sessions: Sessions::new(),
            fees: FeeSchedule::default(),
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = LedgerStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = LedgerStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }

    pub async fn health(&self) -> Result<(), AppError> {
        Ok(self.store.ping().await?)
    }

    // ========================
    // Sessions
    // ========================

    /// Verify credentials and open a session. The token is the only proof of
    /// identity for subsequent calls.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        if !self.store.verify_credentials(username, password).await? {
            warn!(username, "login rejected");
            return Err(AppError::InvalidCredentials);
        }
        info!(username, "login succeeded");
        Ok(self.sessions.issue(username).await)
    }

    /// Resolve a session token to its principal.
    pub async fn authenticate(&self, token: &str) -> Result<String, AppError> {
        self.sessions
            .resolve(token)
            .await
            .ok_or(AppError::Unauthorized)
    }

    // ========================
    // Provisioning
    // ========================

    /// Create a user with an account holding the opening balance.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        opening_balance: Money,
    ) -> Result<Account, AppError> {
        let account = self
            .store
            .create_user(username, password, opening_balance)
            .await?;
        info!(username, "account created");
        Ok(account)
    }

    /// Seed the demo users when the database is empty.
    pub async fn seed_demo_accounts(&self) -> Result<(), AppError> {
        if self.store.has_users().await? {
            return Ok(());
        }
        self.create_account("alice", "alice123", Money::new(dec!(50000.00)))
            .await?;
        self.create_account("bob", "bob123", Money::new(dec!(1000.00)))
            .await?;
        Ok(())
    }

    // ========================
    // Transfers
    // ========================

    /// Validate and execute a transfer from the authenticated sender.
    ///
    /// Validation short-circuits before any ledger interaction: a malformed
    /// request leaves no record. Once validation passes, exactly one transfer
    /// record is committed whatever the outcome, so failed attempts remain
    /// auditable and can be looked up by id.
    pub async fn submit_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount_text: &str,
        reference: &str,
    ) -> Result<TransferReceipt, AppError> {
        if !self.store.account_exists(recipient).await? {
            return Err(AppError::InvalidRecipient);
        }
        if recipient == sender {
            return Err(AppError::SelfTransfer);
        }
        let amount = Money::parse(amount_text)
            .map_err(|_| AppError::InvalidAmount("Invalid amount format".to_string()))?;
        if !amount.is_positive() {
            return Err(AppError::InvalidAmount("Amount must be > 0".to_string()));
        }

        let fee = self.fees.compute_fee(amount);

        match self
            .store
            .execute_transfer(sender, recipient, amount, fee, reference)
            .await?
        {
            TransferOutcome::Completed {
                record,
                sender_balance,
            } => {
                info!(transfer_id = %record.id, sender, recipient, amount = %amount, fee = %fee, "transfer completed");
                Ok(TransferReceipt {
                    transfer_id: record.id,
                    status: record.status,
                    fee: record.fee,
                    sender_balance,
                })
            }
            TransferOutcome::InsufficientFunds { record } => {
                warn!(transfer_id = %record.id, sender, amount = %amount, "transfer failed: insufficient funds");
                Err(AppError::InsufficientFunds {
                    transfer_id: record.id,
                })
            }
        }
    }

    // ========================
    // Queries
    // ========================

    pub async fn get_balance(&self, principal: &str) -> Result<Money, AppError> {
        self.store
            .get_balance(principal)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(principal.to_string()))
    }

    /// Look up a transfer by id. Any authenticated principal may query any
    /// transfer id; scoping to the transfer's parties is a deliberate
    /// non-change (see DESIGN.md).
    pub async fn get_transfer_status(
        &self,
        _principal: &str,
        id: &str,
    ) -> Result<TransferRecord, AppError> {
        let transfer_id =
            Uuid::parse_str(id).map_err(|_| AppError::TransferNotFound(id.to_string()))?;
        self.store
            .get_transfer(transfer_id)
            .await?
            .ok_or_else(|| AppError::TransferNotFound(id.to_string()))
    }

    /// The caller's own transfer history, newest first.
    pub async fn list_transfers(&self, principal: &str) -> Result<Vec<TransferRecord>, AppError> {
        Ok(self.store.transfers_for_account(principal).await?)
    }

    pub async fn audit_trail(&self, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
        Ok(self.store.recent_audit_entries(limit).await?)
    }
}
