use crate::constants::{TRANSACTION_ADDED, TRANSACTION_DELETED};
use crate::error::BudgetError;
use crate::models::{BudgetMode, Category, MemberStatus, SplitPolicy, TransactionKind};
use crate::tests::{create_test_profile, create_test_service, setup_sharing_budget};
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_add_transaction_records_audit() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let tx = service
        .add_transaction(
            &budget.id,
            &owner,
            Some(owner.id.clone()),
            25.5,
            TransactionKind::Expense,
            Category::Food,
            Vec::new(),
            Utc::now(),
            Some("Lunch".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(tx.amount, 25.5);
    assert_eq!(tx.split, SplitPolicy::AllMembers);
    assert_eq!(tx.author_id, owner.id);

    let audits = service.get_budget_audits(&budget.id).await.unwrap();
    assert!(audits.iter().any(|a| a.action == TRANSACTION_ADDED));
}

#[tokio::test]
async fn test_viewer_cannot_add_or_delete_transactions() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let viewer = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    // Accepted but left at the default viewer role.
    service.join_budget_by_code(&budget.join_code, &viewer).await.unwrap();
    service
        .update_member_status(&budget.id, &viewer.id, MemberStatus::Accepted, &owner)
        .await
        .unwrap();

    let result = service
        .add_transaction(
            &budget.id,
            &viewer,
            None,
            10.0,
            TransactionKind::Expense,
            Category::Transport,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await;
    assert!(matches!(result, Err(BudgetError::ViewerCannotEdit(_))));

    let tx = service
        .add_transaction(
            &budget.id,
            &owner,
            None,
            10.0,
            TransactionKind::Expense,
            Category::Transport,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    let result = service.delete_transaction(&tx.id, &viewer).await;
    assert!(matches!(result, Err(BudgetError::ViewerCannotEdit(_))));
}

#[tokio::test]
async fn test_category_must_match_kind() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let result = service
        .add_transaction(
            &budget.id,
            &owner,
            None,
            100.0,
            TransactionKind::Income,
            Category::Food,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await;
    assert!(matches!(result, Err(BudgetError::CategoryKindMismatch(_, _))));
}

#[tokio::test]
async fn test_amount_validation() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    for bad in [-5.0, 0.0, 10.123, f64::INFINITY, 2_000_000.0] {
        let result = service
            .add_transaction(
                &budget.id,
                &owner,
                None,
                bad,
                TransactionKind::Expense,
                Category::Other,
                Vec::new(),
                Utc::now(),
                None,
            )
            .await;
        assert!(
            matches!(result, Err(BudgetError::InvalidInput(_, _))),
            "amount {} should be rejected",
            bad
        );
    }
}

#[tokio::test]
async fn test_payer_must_be_accepted_member() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let outsider = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let result = service
        .add_transaction(
            &budget.id,
            &owner,
            Some(outsider.id.clone()),
            10.0,
            TransactionKind::Expense,
            Category::Food,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await;
    assert!(matches!(result, Err(BudgetError::NotBudgetMember(_))));
}

#[tokio::test]
async fn test_participants_only_in_sharing_expenses() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let tracking = service
        .create_budget("Ledger".to_string(), BudgetMode::Tracking, "USD".to_string(), &owner)
        .await
        .unwrap();

    let result = service
        .add_transaction(
            &tracking.id,
            &owner,
            None,
            10.0,
            TransactionKind::Expense,
            Category::Food,
            vec![owner.id.clone()],
            Utc::now(),
            None,
        )
        .await;
    assert!(matches!(result, Err(BudgetError::InvalidInput(_, _))));

    let sharing = setup_sharing_budget(&service, &owner, &[]).await;
    let result = service
        .add_transaction(
            &sharing.id,
            &owner,
            None,
            10.0,
            TransactionKind::Income,
            Category::Salary,
            vec![owner.id.clone()],
            Utc::now(),
            None,
        )
        .await;
    assert!(matches!(result, Err(BudgetError::InvalidInput(_, _))));
}

#[tokio::test]
async fn test_participants_must_be_accepted_members() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let member = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[&member]).await;

    let result = service
        .add_transaction(
            &budget.id,
            &owner,
            Some(owner.id.clone()),
            60.0,
            TransactionKind::Expense,
            Category::Food,
            vec![member.id.clone(), "stranger".to_string()],
            Utc::now(),
            None,
        )
        .await;
    assert!(matches!(result, Err(BudgetError::InvalidParticipant(_))));

    let tx = service
        .add_transaction(
            &budget.id,
            &owner,
            Some(owner.id.clone()),
            60.0,
            TransactionKind::Expense,
            Category::Food,
            vec![member.id.clone()],
            Utc::now(),
            None,
        )
        .await
        .unwrap();
    match &tx.split {
        SplitPolicy::Among(ids) => assert!(ids.contains(&member.id)),
        SplitPolicy::AllMembers => panic!("expected explicit participant set"),
    }
}

#[tokio::test]
async fn test_delete_transaction() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let tx = service
        .add_transaction(
            &budget.id,
            &owner,
            None,
            10.0,
            TransactionKind::Expense,
            Category::Food,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    service.delete_transaction(&tx.id, &owner).await.unwrap();
    let result = service.delete_transaction(&tx.id, &owner).await;
    assert!(matches!(result, Err(BudgetError::TransactionNotFound(_))));

    let audits = service.get_budget_audits(&budget.id).await.unwrap();
    assert!(audits.iter().any(|a| a.action == TRANSACTION_DELETED));
}

#[tokio::test]
async fn test_transactions_listed_newest_first() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let now = Utc::now();
    for (i, days_ago) in [3i64, 1, 2].iter().enumerate() {
        service
            .add_transaction(
                &budget.id,
                &owner,
                None,
                10.0 + i as f64,
                TransactionKind::Expense,
                Category::Food,
                Vec::new(),
                now - Duration::days(*days_ago),
                None,
            )
            .await
            .unwrap();
    }

    let transactions = service.get_transactions(&budget.id, &owner).await.unwrap();
    assert_eq!(transactions.len(), 3);
    assert!(transactions[0].date >= transactions[1].date);
    assert!(transactions[1].date >= transactions[2].date);
}
