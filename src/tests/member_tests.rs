use crate::constants::{JOIN_REQUESTED, MEMBER_REMOVED};
use crate::error::BudgetError;
use crate::models::{BudgetMode, MemberRole, MemberStatus};
use crate::tests::{create_test_profile, create_test_service, setup_sharing_budget};

#[tokio::test]
async fn test_join_by_code_creates_pending_viewer() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let joiner = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let membership = service.join_budget_by_code(&budget.join_code, &joiner).await.unwrap();

    assert_eq!(membership.role, MemberRole::Viewer);
    assert_eq!(membership.status, MemberStatus::Pending);

    // A pending member cannot read the budget yet.
    let result = service.get_budget(&budget.id, &joiner).await;
    assert!(matches!(result, Err(BudgetError::NotBudgetMember(_))));

    let logs = service.get_app_logs().await.unwrap();
    assert!(logs.iter().any(|l| l.action == JOIN_REQUESTED));
}

#[tokio::test]
async fn test_owner_cannot_join_own_budget() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    let result = service.join_budget_by_code(&budget.join_code, &owner).await;
    assert!(matches!(result, Err(BudgetError::OwnerCannotJoin(_))));
}

#[tokio::test]
async fn test_duplicate_join_request_is_rejected() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let joiner = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    service.join_budget_by_code(&budget.join_code, &joiner).await.unwrap();
    let result = service.join_budget_by_code(&budget.join_code, &joiner).await;
    assert!(matches!(result, Err(BudgetError::JoinRequestPending(_))));
}

#[tokio::test]
async fn test_unknown_join_code() {
    let service = create_test_service();
    let user = create_test_profile(&service, "Bob", "bob@example.com").await;

    let result = service.join_budget_by_code("ZZZZZZ", &user).await;
    assert!(matches!(result, Err(BudgetError::JoinCodeNotFound)));
}

#[tokio::test]
async fn test_accepting_a_request_grants_access() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let joiner = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    service.join_budget_by_code(&budget.join_code, &joiner).await.unwrap();
    service
        .update_member_status(&budget.id, &joiner.id, MemberStatus::Accepted, &owner)
        .await
        .unwrap();

    let seen = service.get_budget(&budget.id, &joiner).await.unwrap();
    let member = seen.member(&joiner.id).unwrap();
    assert_eq!(member.status, MemberStatus::Accepted);

    // A second member cannot accept requests.
    let third = create_test_profile(&service, "Carol", "carol@example.com").await;
    service.join_budget_by_code(&budget.join_code, &third).await.unwrap();
    let result = service
        .update_member_status(&budget.id, &third.id, MemberStatus::Accepted, &joiner)
        .await;
    assert!(matches!(result, Err(BudgetError::NotBudgetOwner(_))));
}

#[tokio::test]
async fn test_rejection_removes_the_membership_row() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let joiner = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[]).await;

    service.join_budget_by_code(&budget.join_code, &joiner).await.unwrap();
    service
        .update_member_status(&budget.id, &joiner.id, MemberStatus::Rejected, &owner)
        .await
        .unwrap();

    let seen = service.get_budget(&budget.id, &owner).await.unwrap();
    assert!(seen.member(&joiner.id).is_none());

    // A rejected user may ask again.
    let membership = service.join_budget_by_code(&budget.join_code, &joiner).await.unwrap();
    assert_eq!(membership.status, MemberStatus::Pending);
}

#[tokio::test]
async fn test_owner_membership_is_immutable() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let member = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[&member]).await;

    let result = service
        .update_member_role(&budget.id, &owner.id, MemberRole::Viewer, &owner)
        .await;
    assert!(matches!(result, Err(BudgetError::CannotModifyOwner)));

    let result = service
        .update_member_role(&budget.id, &member.id, MemberRole::Owner, &owner)
        .await;
    assert!(matches!(result, Err(BudgetError::CannotModifyOwner)));

    let result = service.remove_member(&budget.id, &owner.id, &owner).await;
    assert!(matches!(result, Err(BudgetError::CannotModifyOwner)));
}

#[tokio::test]
async fn test_remove_member() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let member = create_test_profile(&service, "Bob", "bob@example.com").await;
    let budget = setup_sharing_budget(&service, &owner, &[&member]).await;

    service.remove_member(&budget.id, &member.id, &owner).await.unwrap();

    let seen = service.get_budget(&budget.id, &owner).await.unwrap();
    assert!(seen.member(&member.id).is_none());

    let audits = service.get_budget_audits(&budget.id).await.unwrap();
    assert!(audits.iter().any(|a| a.action == MEMBER_REMOVED));
}

#[tokio::test]
async fn test_status_update_for_unknown_member() {
    let service = create_test_service();
    let owner = create_test_profile(&service, "Alice", "alice@example.com").await;
    let budget = service
        .create_budget("Solo".to_string(), BudgetMode::Sharing, "USD".to_string(), &owner)
        .await
        .unwrap();

    let result = service
        .update_member_status(&budget.id, "nobody", MemberStatus::Accepted, &owner)
        .await;
    assert!(matches!(result, Err(BudgetError::MembershipNotFound(_))));
}
