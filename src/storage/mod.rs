use crate::error::BudgetError;
use crate::models::{Budget, BudgetAudit, Profile, Transaction};
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_profile(&self, profile: Profile) -> Result<Profile, BudgetError>;
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, BudgetError>;
    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, BudgetError>;
    async fn update_profile(&self, profile: Profile) -> Result<Profile, BudgetError>;

    async fn save_budget(&self, budget: Budget) -> Result<(), BudgetError>;
    async fn get_budget(&self, budget_id: &str) -> Result<Option<Budget>, BudgetError>;
    async fn get_budget_by_join_code(&self, join_code: &str) -> Result<Option<Budget>, BudgetError>;
    async fn delete_budget(&self, budget_id: &str) -> Result<(), BudgetError>;
    async fn get_user_budgets(&self, user_id: &str) -> Result<Vec<Budget>, BudgetError>;

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), BudgetError>;
    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, BudgetError>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), BudgetError>;
    async fn delete_transactions_by_budget(&self, budget_id: &str) -> Result<(), BudgetError>;
    async fn get_transactions_by_budget(&self, budget_id: &str) -> Result<Vec<Transaction>, BudgetError>;

    async fn save_budget_audit(&self, audit: BudgetAudit) -> Result<(), BudgetError>;
    async fn get_budget_audits(&self, budget_id: &str) -> Result<Vec<BudgetAudit>, BudgetError>;
}

pub mod in_memory;
