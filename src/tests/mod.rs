mod debt_tests;
mod member_tests;
mod transaction_tests;

use crate::logger::in_memory::InMemoryLogging;
use crate::models::{Budget, BudgetMode, MemberRole, MemberStatus, Profile};
use crate::service::BudgetService;
use crate::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> BudgetService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    BudgetService::new(storage, logging)
}

pub async fn create_test_profile(
    service: &BudgetService<InMemoryLogging, InMemoryStorage>,
    name: &str,
    email: &str,
) -> Profile {
    service
        .create_profile(name.to_string(), email.to_string(), None, "USD".to_string())
        .await
        .unwrap()
}

/// Creates a sharing budget and walks every extra profile through the real
/// join/accept flow, promoting them to editor.
pub async fn setup_sharing_budget(
    service: &BudgetService<InMemoryLogging, InMemoryStorage>,
    owner: &Profile,
    members: &[&Profile],
) -> Budget {
    let budget = service
        .create_budget("Shared Flat".to_string(), BudgetMode::Sharing, "USD".to_string(), owner)
        .await
        .unwrap();
    for member in members {
        service.join_budget_by_code(&budget.join_code, member).await.unwrap();
        service
            .update_member_status(&budget.id, &member.id, MemberStatus::Accepted, owner)
            .await
            .unwrap();
        service
            .update_member_role(&budget.id, &member.id, MemberRole::Editor, owner)
            .await
            .unwrap();
    }
    service.get_budget(&budget.id, owner).await.unwrap()
}
