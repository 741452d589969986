use crate::setup_test_db;
use freightdesk::models::common::{Feature, TransactionKind, FEATURE_MANUAL};
use freightdesk::models::credit_transactions_ext::CreditTransactionExt;
use freightdesk::models::credits::replay_balance;
use freightdesk::services::CreditsService;
use freightdesk::ApiError;
use uuid::Uuid;

#[tokio::test]
#[ignore] // Run only when database is available
async fn test_account_starts_zero_initialized() {
    let db = setup_test_db().await;
    let service = CreditsService::new(db);

    let tenant_id = Uuid::new_v4();

    let account = service.get_account(tenant_id).await.unwrap();
    assert_eq!(account.tenant_id, tenant_id);
    assert_eq!(account.balance, 0);
    assert_eq!(account.total_added, 0);
    assert_eq!(account.total_used, 0);

    // An empty account can afford nothing but a zero check
    assert!(service.has_sufficient_credits(tenant_id, 0).await.unwrap());
    assert!(!service.has_sufficient_credits(tenant_id, 1).await.unwrap());
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn test_credit_and_debit_lifecycle() {
    let db = setup_test_db().await;
    let service = CreditsService::new(db);

    let tenant_id = Uuid::new_v4();

    // Credit 50
    let account = service
        .credit(tenant_id, 50, FEATURE_MANUAL, "initial top-up", None)
        .await
        .unwrap();
    assert_eq!(account.balance, 50);
    assert_eq!(account.total_added, 50);
    assert_eq!(account.total_used, 0);

    // Debit 20 for an order
    let order_id = Uuid::new_v4();
    let account = service
        .debit(
            tenant_id,
            20,
            Feature::Order.as_str(),
            "order placed",
            None,
            Some(order_id),
        )
        .await
        .unwrap();
    assert_eq!(account.balance, 30);
    assert_eq!(account.total_added, 50);
    assert_eq!(account.total_used, 20);

    // balance == total_added - total_used at every observable point
    assert_eq!(account.balance, account.total_added - account.total_used);

    // The persisted account matches what the mutations returned
    let fetched = service.get_account(tenant_id).await.unwrap();
    assert_eq!(fetched.balance, 30);
    assert_eq!(fetched.total_added, 50);
    assert_eq!(fetched.total_used, 20);

    // Ledger carries both entries with running balances and the back-reference
    let ledger = service.get_ledger(tenant_id).await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].kind, TransactionKind::Credit.as_str());
    assert_eq!(ledger[0].balance_after, 50);
    assert_eq!(ledger[1].kind, TransactionKind::Debit.as_str());
    assert_eq!(ledger[1].balance_after, 30);
    assert_eq!(ledger[1].order_id, Some(order_id));
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn test_debit_insufficient_credits_changes_nothing() {
    let db = setup_test_db().await;
    let service = CreditsService::new(db);

    let tenant_id = Uuid::new_v4();

    service
        .credit(tenant_id, 5, FEATURE_MANUAL, "small top-up", None)
        .await
        .unwrap();

    let result = service
        .debit(
            tenant_id,
            10,
            Feature::Order.as_str(),
            "order placed",
            None,
            None,
        )
        .await;

    assert!(matches!(result, Err(ApiError::InsufficientCredits(_))));

    // No mutation happened: balance and ledger are untouched
    let account = service.get_account(tenant_id).await.unwrap();
    assert_eq!(account.balance, 5);
    assert_eq!(account.total_used, 0);

    let ledger = service.get_ledger(tenant_id).await.unwrap();
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn test_debit_rejects_non_positive_amounts() {
    let db = setup_test_db().await;
    let service = CreditsService::new(db);

    let tenant_id = Uuid::new_v4();

    let result = service
        .debit(tenant_id, 0, Feature::Order.as_str(), "nothing", None, None)
        .await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));

    let result = service
        .credit(tenant_id, -5, FEATURE_MANUAL, "nothing", None)
        .await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn test_reset_semantics() {
    let db = setup_test_db().await;
    let service = CreditsService::new(db);

    let tenant_id = Uuid::new_v4();
    let admin_id = Uuid::new_v4();

    service
        .credit(tenant_id, 120, FEATURE_MANUAL, "top-up", None)
        .await
        .unwrap();

    // Reset upwards: ledger records the delta as a credit
    let account = service
        .reset(tenant_id, 500, "manual adjustment", admin_id)
        .await
        .unwrap();
    assert_eq!(account.balance, 500);
    assert_eq!(account.balance, account.total_added - account.total_used);

    let ledger = service.get_ledger(tenant_id).await.unwrap();
    let latest = ledger.last().unwrap();
    assert_eq!(latest.balance_after, 500);
    assert_eq!(latest.kind, TransactionKind::Credit.as_str());
    assert_eq!(latest.amount, 380);
    assert_eq!(latest.actor_id, Some(admin_id));

    // Reset downwards: ledger records the delta as a debit
    let account = service
        .reset(tenant_id, 100, "correction", admin_id)
        .await
        .unwrap();
    assert_eq!(account.balance, 100);
    assert_eq!(account.balance, account.total_added - account.total_used);

    let ledger = service.get_ledger(tenant_id).await.unwrap();
    let latest = ledger.last().unwrap();
    assert_eq!(latest.balance_after, 100);
    assert_eq!(latest.kind, TransactionKind::Debit.as_str());
    assert_eq!(latest.amount, 400);

    // Reset to the current balance appends nothing
    let before = ledger.len();
    let account = service
        .reset(tenant_id, 100, "no-op", admin_id)
        .await
        .unwrap();
    assert_eq!(account.balance, 100);
    let ledger = service.get_ledger(tenant_id).await.unwrap();
    assert_eq!(ledger.len(), before);
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn test_ledger_replay_reproduces_balance() {
    let db = setup_test_db().await;
    let service = CreditsService::new(db);

    let tenant_id = Uuid::new_v4();
    let admin_id = Uuid::new_v4();

    service
        .credit(tenant_id, 40, FEATURE_MANUAL, "top-up", None)
        .await
        .unwrap();
    service
        .debit(tenant_id, 3, Feature::Order.as_str(), "order", None, None)
        .await
        .unwrap();
    service
        .debit(
            tenant_id,
            10,
            Feature::ImageProcessing.as_str(),
            "label scan",
            None,
            None,
        )
        .await
        .unwrap();
    service
        .reset(tenant_id, 100, "adjustment", admin_id)
        .await
        .unwrap();
    service
        .debit(tenant_id, 2, Feature::TextProcessing.as_str(), "summary", None, None)
        .await
        .unwrap();

    let account = service.get_account(tenant_id).await.unwrap();
    let ledger = service.get_ledger(tenant_id).await.unwrap();

    // Summing signed amounts in createdAt order reproduces the balance
    assert_eq!(replay_balance(&ledger), account.balance);

    // And every intermediate balance_after matches the running sum
    let mut running = 0;
    for entry in &ledger {
        running += entry.signed_amount();
        assert_eq!(entry.balance_after, running);
    }
}

#[tokio::test]
#[ignore] // Run only when database is available
async fn test_list_transactions_newest_first() {
    let db = setup_test_db().await;
    let service = CreditsService::new(db);

    let tenant_id = Uuid::new_v4();

    service
        .credit(tenant_id, 30, FEATURE_MANUAL, "first", None)
        .await
        .unwrap();
    service
        .debit(tenant_id, 1, Feature::Order.as_str(), "second", None, None)
        .await
        .unwrap();
    service
        .debit(tenant_id, 2, Feature::TextProcessing.as_str(), "third", None, None)
        .await
        .unwrap();

    let (page_one, total_items, total_pages) =
        service.list_transactions(tenant_id, 1, 2).await.unwrap();

    assert_eq!(total_items, 3);
    assert_eq!(total_pages, 2);
    assert_eq!(page_one.len(), 2);
    assert_eq!(page_one[0].description, "third");
    assert_eq!(page_one[1].description, "second");

    let (page_two, _, _) = service.list_transactions(tenant_id, 2, 2).await.unwrap();
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].description, "first");
}
