use crate::constants::SETTLE_EPSILON;
use crate::error::BudgetError;
use crate::models::{BudgetMode, Category, TransactionKind};
use crate::analytics::TimeRange;
use crate::tests::{create_test_profile, create_test_service, setup_sharing_budget};
use chrono::Utc;

#[tokio::test]
async fn test_debt_summary_splits_equally_by_default() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let bob = create_test_profile(&service, "Bob", "bob@example.com").await;
    let carol = create_test_profile(&service, "Carol", "carol@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[&bob, &carol]).await;

    service
        .add_transaction(
            &budget.id,
            &owner,
            Some(owner.id.clone()),
            90.0,
            TransactionKind::Expense,
            Category::Food,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    let report = service.get_debt_summary(&budget.id, &bob).await.unwrap();

    assert_eq!(report.total_spending, 90.0);
    assert!((report.balances[&owner.id] - 60.0).abs() < 1e-9);
    assert!((report.balances[&bob.id] + 30.0).abs() < 1e-9);
    assert!((report.balances[&carol.id] + 30.0).abs() < 1e-9);
    assert_eq!(report.transfers.len(), 2);
    assert!(report.transfers.iter().all(|t| t.to == owner.id));
}

#[tokio::test]
async fn test_debt_summary_with_explicit_participants() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let bob = create_test_profile(&service, "Bob", "bob@example.com").await;
    let carol = create_test_profile(&service, "Carol", "carol@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[&bob, &carol]).await;

    service
        .add_transaction(
            &budget.id,
            &owner,
            Some(owner.id.clone()),
            100.0,
            TransactionKind::Expense,
            Category::Entertainment,
            vec![owner.id.clone(), bob.id.clone()],
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    let report = service.get_debt_summary(&budget.id, &owner).await.unwrap();

    assert!((report.balances[&owner.id] - 50.0).abs() < 1e-9);
    assert!((report.balances[&bob.id] + 50.0).abs() < 1e-9);
    assert_eq!(report.balances[&carol.id], 0.0);
    assert_eq!(report.transfers.len(), 1);
    assert_eq!(report.transfers[0].from, bob.id);
    assert_eq!(report.transfers[0].to, owner.id);
}

#[tokio::test]
async fn test_debt_summary_excludes_common_expenses() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let bob = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[&bob]).await;

    service
        .add_transaction(
            &budget.id,
            &owner,
            None,
            40.0,
            TransactionKind::Expense,
            Category::Housing,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    let report = service.get_debt_summary(&budget.id, &owner).await.unwrap();

    assert_eq!(report.total_spending, 0.0);
    assert!(report.transfers.is_empty());
    assert!(report.balances.values().all(|b| b.abs() <= SETTLE_EPSILON));
}

#[tokio::test]
async fn test_debt_summary_requires_sharing_mode() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = service
        .create_budget("Ledger".to_string(), BudgetMode::Tracking, "USD".to_string(), &owner)
        .await
        .unwrap();

    let result = service.get_debt_summary(&budget.id, &owner).await;
    assert!(matches!(result, Err(BudgetError::NotSharingBudget(_))));
}

#[tokio::test]
async fn test_debt_summary_requires_membership() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let outsider = create_test_profile(&service, "Eve", "eve@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let result = service.get_debt_summary(&budget.id, &outsider).await;
    assert!(matches!(result, Err(BudgetError::NotBudgetMember(_))));
}

#[tokio::test]
async fn test_removed_member_keeps_history_out_of_reconciliation() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let bob = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[&bob]).await;

    service
        .add_transaction(
            &budget.id,
            &owner,
            Some(bob.id.clone()),
            80.0,
            TransactionKind::Expense,
            Category::Food,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    service.remove_member(&budget.id, &bob.id, &owner).await.unwrap();

    // Bob's expense no longer qualifies once he is gone.
    let report = service.get_debt_summary(&budget.id, &owner).await.unwrap();
    assert_eq!(report.total_spending, 0.0);
    assert!(report.transfers.is_empty());
    assert!(!report.balances.contains_key(&bob.id));
}

#[tokio::test]
async fn test_analytics_summary_over_budget_history() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    service
        .add_transaction(
            &budget.id,
            &owner,
            Some(owner.id.clone()),
            1000.0,
            TransactionKind::Income,
            Category::Salary,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await
        .unwrap();
    service
        .add_transaction(
            &budget.id,
            &owner,
            None,
            250.0,
            TransactionKind::Expense,
            Category::Housing,
            Vec::new(),
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    let summary = service.get_analytics(&budget.id, TimeRange::Year, &owner).await.unwrap();

    assert_eq!(summary.range, TimeRange::Year);
    assert!(summary
        .categories
        .iter()
        .any(|c| c.category == Category::Salary && (c.total - 1000.0).abs() < 1e-9));
    assert!(!summary.trend.is_empty());
    assert!((summary.trend.last().unwrap().balance - 750.0).abs() < 1e-9);

    let common = summary.contributions.iter().find(|c| c.payer_id.is_none()).unwrap();
    assert!((common.expense - 250.0).abs() < 1e-9);
}
