use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    Account, AuditEntry, AuditOperation, Money, TransferId, TransferRecord, TransferStatus,
};

use super::MIGRATION_001_INITIAL;

/// Outcome of the atomic transfer operation.
#[derive(Debug)]
pub enum TransferOutcome {
    /// Both balances moved and a COMPLETED record was committed.
    Completed {
        record: TransferRecord,
        sender_balance: Money,
    },
    /// The sender could not cover amount + fee. A FAILED record was committed
    /// and no balance changed.
    InsufficientFunds { record: TransferRecord },
}

/// The authoritative keeper of balances, transfer records and the audit
/// trail. This is the only component that mutates balances, and it only does
/// so inside [`LedgerStore::execute_transfer`].
pub struct LedgerStore {
    pool: SqlitePool,
    // SQLite allows one writer at a time. Transfers queue on this lock so
    // concurrent submissions serialize instead of surfacing SQLITE_BUSY.
    write_lock: Mutex<()>,
}

impl LedgerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Cheap liveness probe for the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database unreachable")?;
        Ok(())
    }

    // ========================
    // User / account provisioning
    // ========================

    /// Create a user and their account in one transaction.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        opening_balance: Money,
    ) -> Result<Account> {
        let _writer = self.write_lock.lock().await;
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin provisioning transaction")?;

        let account = Account::new(username, opening_balance);
        let created_at = account.created_at.to_rfc3339();

        sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)")
            .bind(username)
            .bind(sha256_hex(password))
            .bind(&created_at)
            .execute(&mut *tx)
            .await
            .context("Failed to create user")?;

        sqlx::query("INSERT INTO accounts (owner, balance, created_at) VALUES (?, ?, ?)")
            .bind(username)
            .bind(account.balance.to_string())
            .bind(&created_at)
            .execute(&mut *tx)
            .await
            .context("Failed to create account")?;

        Self::append_audit(
            &mut tx,
            AuditOperation::UserCreated,
            username,
            &format!("Opening balance: {}", account.balance),
        )
        .await?;

        tx.commit()
            .await
            .context("Failed to commit provisioning transaction")?;
        Ok(account)
    }

    /// Check a username/password pair against the stored digest, recording
    /// the attempt in the audit trail.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<bool> {
        let row = sqlx::query("SELECT password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        let verified = match row {
            Some(row) => row.get::<String, _>("password_hash") == sha256_hex(password),
            None => false,
        };

        let operation = if verified {
            AuditOperation::LoginSuccess
        } else {
            AuditOperation::LoginFailed
        };
        if !username.is_empty() {
            sqlx::query(
                "INSERT INTO audit_log (operation, principal, details, timestamp) VALUES (?, ?, '', ?)",
            )
            .bind(operation.as_str())
            .bind(username)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .context("Failed to record login attempt")?;
        }

        Ok(verified)
    }

    /// True once any user has been provisioned.
    pub async fn has_users(&self) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    // ========================
    // Read operations
    // ========================

    pub async fn get_account(&self, owner: &str) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT owner, balance, created_at FROM accounts WHERE owner = ?")
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_balance(&self, owner: &str) -> Result<Option<Money>> {
        Ok(self.get_account(owner).await?.map(|account| account.balance))
    }

    pub async fn account_exists(&self, owner: &str) -> Result<bool> {
        Ok(self.get_account(owner).await?.is_some())
    }

    pub async fn get_transfer(&self, id: TransferId) -> Result<Option<TransferRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, sender, recipient, amount, fee, reference, status, reason, created_at, updated_at
            FROM transfers
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transfer")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transfer(&row)?)),
            None => Ok(None),
        }
    }

    /// All transfers where the account is sender or recipient, newest first.
    pub async fn transfers_for_account(&self, owner: &str) -> Result<Vec<TransferRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender, recipient, amount, fee, reference, status, reason, created_at, updated_at
            FROM transfers
            WHERE sender = ? OR recipient = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transfers")?;

        rows.iter().map(Self::row_to_transfer).collect()
    }

    pub async fn recent_audit_entries(&self, limit: i64) -> Result<Vec<AuditEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, operation, principal, details, timestamp
            FROM audit_log
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list audit entries")?;

        rows.iter().map(Self::row_to_audit_entry).collect()
    }

    // ========================
    // The atomic transfer operation
    // ========================

    /// Attempt a transfer as one indivisible unit: the sender's balance is
    /// read, checked and updated inside a single transaction together with
    /// the recipient credit, the transfer record and the audit entries.
    /// Nothing is visible to other operations until the commit, and a storage
    /// error aborts the whole unit.
    pub async fn execute_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: Money,
        fee: Money,
        reference: &str,
    ) -> Result<TransferOutcome> {
        let _writer = self.write_lock.lock().await;
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transfer transaction")?;

        let sender_balance = Self::balance_in_tx(&mut tx, sender)
            .await?
            .ok_or_else(|| anyhow!("Sender account missing: {sender}"))?;

        let total = amount + fee;
        if sender_balance < total {
            let record =
                TransferRecord::failed(sender, recipient, amount, fee, reference, "Insufficient funds");
            Self::insert_transfer(&mut tx, &record).await?;
            Self::append_audit(
                &mut tx,
                AuditOperation::TransferCreated,
                sender,
                &format!(
                    "Transfer {} to {} for {} failed: insufficient funds",
                    record.id, recipient, amount
                ),
            )
            .await?;
            tx.commit()
                .await
                .context("Failed to commit failed transfer")?;
            return Ok(TransferOutcome::InsufficientFunds { record });
        }

        let recipient_balance = Self::balance_in_tx(&mut tx, recipient)
            .await?
            .ok_or_else(|| anyhow!("Recipient account missing: {recipient}"))?;

        let new_sender_balance = sender_balance - total;
        let new_recipient_balance = recipient_balance + amount;

        Self::set_balance_in_tx(&mut tx, sender, new_sender_balance).await?;
        Self::set_balance_in_tx(&mut tx, recipient, new_recipient_balance).await?;

        let record = TransferRecord::completed(sender, recipient, amount, fee, reference);
        Self::insert_transfer(&mut tx, &record).await?;

        Self::append_audit(
            &mut tx,
            AuditOperation::TransferCreated,
            sender,
            &format!("Transfer {} to {}: {}", record.id, recipient, amount),
        )
        .await?;
        Self::append_audit(
            &mut tx,
            AuditOperation::BalanceUpdated,
            sender,
            &format!("New balance: {new_sender_balance}"),
        )
        .await?;
        Self::append_audit(
            &mut tx,
            AuditOperation::BalanceUpdated,
            recipient,
            &format!("New balance: {new_recipient_balance}"),
        )
        .await?;

        tx.commit().await.context("Failed to commit transfer")?;

        Ok(TransferOutcome::Completed {
            record,
            sender_balance: new_sender_balance,
        })
    }

    // ========================
    // Transaction-scoped helpers
    // ========================

    async fn balance_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        owner: &str,
    ) -> Result<Option<Money>> {
        let row = sqlx::query("SELECT balance FROM accounts WHERE owner = ?")
            .bind(owner)
            .fetch_optional(&mut **tx)
            .await
            .context("Failed to read balance")?;

        match row {
            Some(row) => {
                let text: String = row.get("balance");
                Ok(Some(Money::parse(&text).context("Invalid stored balance")?))
            }
            None => Ok(None),
        }
    }

    async fn set_balance_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        owner: &str,
        balance: Money,
    ) -> Result<()> {
        sqlx::query("UPDATE accounts SET balance = ? WHERE owner = ?")
            .bind(balance.to_string())
            .bind(owner)
            .execute(&mut **tx)
            .await
            .context("Failed to update balance")?;
        Ok(())
    }

    async fn insert_transfer(
        tx: &mut Transaction<'_, Sqlite>,
        record: &TransferRecord,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transfers (id, sender, recipient, amount, fee, reference, status, reason, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.sender)
        .bind(&record.recipient)
        .bind(record.amount.to_string())
        .bind(record.fee.to_string())
        .bind(&record.reference)
        .bind(record.status.as_str())
        .bind(&record.reason)
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&mut **tx)
        .await
        .context("Failed to insert transfer")?;
        Ok(())
    }

    // Only callable with an open transaction: audit entries documenting a
    // mutation commit or abort together with it.
    async fn append_audit(
        tx: &mut Transaction<'_, Sqlite>,
        operation: AuditOperation,
        principal: &str,
        details: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO audit_log (operation, principal, details, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(operation.as_str())
        .bind(principal)
        .bind(details)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut **tx)
        .await
        .context("Failed to append audit entry")?;
        Ok(())
    }

    // ========================
    // Row mappers
    // ========================

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let balance_text: String = row.get("balance");
        Ok(Account {
            owner: row.get("owner"),
            balance: Money::parse(&balance_text).context("Invalid stored balance")?,
            created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        })
    }

    fn row_to_transfer(row: &sqlx::sqlite::SqliteRow) -> Result<TransferRecord> {
        let id_text: String = row.get("id");
        let amount_text: String = row.get("amount");
        let fee_text: String = row.get("fee");
        let status_text: String = row.get("status");

        Ok(TransferRecord {
            id: Uuid::parse_str(&id_text).context("Invalid transfer ID")?,
            sender: row.get("sender"),
            recipient: row.get("recipient"),
            amount: Money::parse(&amount_text).context("Invalid transfer amount")?,
            fee: Money::parse(&fee_text).context("Invalid transfer fee")?,
            reference: row.get("reference"),
            status: TransferStatus::from_str(&status_text)
                .ok_or_else(|| anyhow!("Invalid transfer status: {status_text}"))?,
            reason: row.get("reason"),
            created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
            updated_at: parse_timestamp(&row.get::<String, _>("updated_at"))?,
        })
    }

    fn row_to_audit_entry(row: &sqlx::sqlite::SqliteRow) -> Result<AuditEntry> {
        let operation_text: String = row.get("operation");
        Ok(AuditEntry {
            id: row.get("id"),
            operation: AuditOperation::from_str(&operation_text)
                .ok_or_else(|| anyhow!("Invalid audit operation: {operation_text}"))?,
            principal: row.get("principal"),
            details: row.get("details"),
            timestamp: parse_timestamp(&row.get::<String, _>("timestamp"))?,
        })
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(text)
        .context("Invalid timestamp")?
        .with_timezone(&Utc))
}

fn sha256_hex(input: &str) -> String {
    use std::fmt::Write;

    let digest = Sha256::digest(input.as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}
