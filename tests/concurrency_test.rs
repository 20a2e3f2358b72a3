mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{money, test_service};
use denario::application::AppError;

/// Many tasks debit the same sender at once, asking for more in total than
/// the account holds. The atomic ledger operation must let exactly the
/// affordable prefix through: completed debits never exceed the opening
/// balance, and everything else fails with insufficient funds.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_debits_never_overdraw() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .create_account("carol", "carol123", money("1000.00"))
        .await?;
    service
        .create_account("dave", "dave123", money("0.00"))
        .await?;

    let service = Arc::new(service);

    // 8 x 200.00 = 1600.00 requested against a 1000.00 balance (fee 0 in the
    // free tier), so exactly 5 can complete.
    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.submit_transfer("carol", "dave", "200.00", "").await
        }));
    }

    let mut completed = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await? {
            Ok(receipt) => {
                assert_eq!(receipt.fee, money("0.00"));
                completed += 1;
            }
            Err(AppError::InsufficientFunds { .. }) => rejected += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(completed, 5);
    assert_eq!(rejected, 3);
    assert_eq!(service.get_balance("carol").await?, money("0.00"));
    assert_eq!(service.get_balance("dave").await?, money("1000.00"));

    Ok(())
}

/// Every attempt that reaches the ledger leaves exactly one record, so under
/// contention the history still accounts for all submissions.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_contended_attempt_is_recorded() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .create_account("carol", "carol123", money("500.00"))
        .await?;
    service
        .create_account("dave", "dave123", money("0.00"))
        .await?;

    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..6 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.submit_transfer("carol", "dave", "150.00", "").await
        }));
    }
    for handle in handles {
        let _ = handle.await?;
    }

    let history = service.list_transfers("carol").await?;
    assert_eq!(history.len(), 6);

    let completed_total: i64 = history
        .iter()
        .filter(|t| t.status == denario::domain::TransferStatus::Completed)
        .count() as i64;
    assert_eq!(completed_total, 3); // 3 x 150.00 = 450.00 fits in 500.00

    Ok(())
}
