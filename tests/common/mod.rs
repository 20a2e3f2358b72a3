// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use denario::application::BankService;
use denario::domain::Money;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(BankService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = BankService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a service seeded with the standard demo users:
/// alice with 50000.00 and bob with 1000.00
pub async fn seeded_service() -> Result<(BankService, TempDir)> {
    let (service, temp_dir) = test_service().await?;
    service
        .create_account("alice", "alice123", money("50000.00"))
        .await?;
    service
        .create_account("bob", "bob123", money("1000.00"))
        .await?;
    Ok((service, temp_dir))
}

/// Parse a money literal, panicking on malformed test input
pub fn money(text: &str) -> Money {
    Money::parse(text).expect("valid money literal")
}
