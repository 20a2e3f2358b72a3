use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Money;

/// An account held by one principal. The balance is only ever mutated inside
/// a single atomic ledger operation, never read-modified-written across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique principal identifier owning this account.
    pub owner: String,
    /// Current balance; never negative.
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(owner: impl Into<String>, balance: Money) -> Self {
        Self {
            owner: owner.into(),
            balance,
            created_at: Utc::now(),
        }
    }
}
