mod common;

use anyhow::Result;
use common::{money, seeded_service};
use denario::application::AppError;
use denario::domain::TransferStatus;

#[tokio::test]
async fn test_transfer_in_free_tier_moves_principal_only() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let receipt = service
        .submit_transfer("bob", "alice", "100.00", "lunch")
        .await?;

    assert_eq!(receipt.status, TransferStatus::Completed);
    assert_eq!(receipt.fee, money("0.00"));
    assert_eq!(receipt.sender_balance, money("900.00"));

    assert_eq!(service.get_balance("bob").await?, money("900.00"));
    assert_eq!(service.get_balance("alice").await?, money("50100.00"));

    let record = service
        .get_transfer_status("bob", &receipt.transfer_id.to_string())
        .await?;
    assert_eq!(record.status, TransferStatus::Completed);
    assert_eq!(record.amount, money("100.00"));
    assert_eq!(record.reference, "lunch");
    assert!(record.reason.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_fee_is_debited_on_top_of_amount() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    // 3000.00 sits in the 0.25% tier: fee 7.50.
    let receipt = service
        .submit_transfer("alice", "bob", "3000.00", "")
        .await?;

    assert_eq!(receipt.fee, money("7.50"));
    assert_eq!(receipt.sender_balance, money("46992.50"));
    assert_eq!(service.get_balance("bob").await?, money("4000.00"));

    Ok(())
}

#[tokio::test]
async fn test_insufficient_funds_persists_failed_record() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    // Fee for 10000.00 caps at 20.00, so bob would need 10020.00.
    let err = service
        .submit_transfer("bob", "alice", "10000.00", "")
        .await
        .unwrap_err();

    let AppError::InsufficientFunds { transfer_id } = err else {
        panic!("expected insufficient funds, got: {err}");
    };

    // The failed attempt is auditable and retrievable by id.
    let record = service
        .get_transfer_status("bob", &transfer_id.to_string())
        .await?;
    assert_eq!(record.status, TransferStatus::Failed);
    assert_eq!(record.reason, "Insufficient funds");
    assert_eq!(record.amount, money("10000.00"));
    assert_eq!(record.fee, money("20.00"));

    // No balance moved.
    assert_eq!(service.get_balance("bob").await?, money("1000.00"));
    assert_eq!(service.get_balance("alice").await?, money("50000.00"));

    Ok(())
}

#[tokio::test]
async fn test_self_transfer_is_rejected_without_a_record() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let err = service
        .submit_transfer("bob", "bob", "10.00", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SelfTransfer));

    assert!(service.list_transfers("bob").await?.is_empty());
    assert_eq!(service.get_balance("bob").await?, money("1000.00"));

    Ok(())
}

#[tokio::test]
async fn test_unknown_recipient_is_rejected_without_a_record() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let err = service
        .submit_transfer("bob", "mallory", "10.00", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRecipient));
    assert!(service.list_transfers("bob").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_malformed_and_nonpositive_amounts_are_rejected() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    for amount in ["abc", "12.34.56", "", "0", "0.00", "-5.00"] {
        let err = service
            .submit_transfer("bob", "alice", amount, "")
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::InvalidAmount(_)),
            "amount {amount:?} should be invalid"
        );
    }

    assert!(service.list_transfers("bob").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_amount_is_quantized_on_parse() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    // Sub-cent digits round half-up rather than being rejected.
    let receipt = service
        .submit_transfer("bob", "alice", "10.005", "")
        .await?;

    let record = service
        .get_transfer_status("bob", &receipt.transfer_id.to_string())
        .await?;
    assert_eq!(record.amount, money("10.01"));
    assert_eq!(receipt.sender_balance, money("989.99"));

    Ok(())
}

#[tokio::test]
async fn test_money_is_conserved_up_to_fees() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let opening_total = money("51000.00");

    let first = service
        .submit_transfer("alice", "bob", "3000.00", "")
        .await?;
    let second = service.submit_transfer("bob", "alice", "150.00", "").await?;
    let fees = first.fee + second.fee;

    let closing_total =
        service.get_balance("alice").await? + service.get_balance("bob").await?;
    assert_eq!(closing_total, opening_total - fees);

    Ok(())
}

#[tokio::test]
async fn test_repeated_balance_reads_are_stable() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let first = service.get_balance("alice").await?;
    let second = service.get_balance("alice").await?;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn test_any_principal_can_query_any_transfer() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let receipt = service.submit_transfer("bob", "alice", "50.00", "").await?;

    // alice is a party; carol is not even an account holder. Both resolve.
    let as_alice = service
        .get_transfer_status("alice", &receipt.transfer_id.to_string())
        .await?;
    let as_carol = service
        .get_transfer_status("carol", &receipt.transfer_id.to_string())
        .await?;
    assert_eq!(as_alice.id, as_carol.id);

    Ok(())
}

#[tokio::test]
async fn test_unknown_and_malformed_transfer_ids_are_not_found() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let err = service
        .get_transfer_status("bob", "00000000-0000-0000-0000-000000000000")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TransferNotFound(_)));

    let err = service
        .get_transfer_status("bob", "not-a-transfer-id")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TransferNotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_transfer_history_lists_both_directions() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    service.submit_transfer("bob", "alice", "10.00", "").await?;
    service.submit_transfer("alice", "bob", "25.00", "").await?;

    let history = service.list_transfers("bob").await?;
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|t| t.sender == "bob"));
    assert!(history.iter().any(|t| t.recipient == "bob"));

    Ok(())
}

#[tokio::test]
async fn test_audit_trail_documents_transfers_and_balances() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    service.submit_transfer("bob", "alice", "75.00", "").await?;

    let entries = service.audit_trail(100).await?;
    let operations: Vec<_> = entries.iter().map(|e| e.operation.as_str()).collect();
    assert!(operations.contains(&"TRANSFER_CREATED"));
    assert!(operations.contains(&"BALANCE_UPDATED"));
    assert!(operations.contains(&"USER_CREATED"));

    Ok(())
}

#[tokio::test]
async fn test_login_succeeds_with_valid_credentials_only() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let token = service.login("alice", "alice123").await?;
    assert_eq!(service.authenticate(&token).await?, "alice");

    let err = service.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    let err = service.login("nobody", "alice123").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    let err = service.authenticate("bogus-token").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    Ok(())
}
