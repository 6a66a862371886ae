use crate::error::BudgetError;
use crate::models::{Budget, BudgetAudit, Profile, Transaction};
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryStorage {
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
    profiles_by_email: Arc<RwLock<HashMap<String, String>>>,
    budgets: Arc<RwLock<HashMap<String, Budget>>>,
    budgets_by_join_code: Arc<RwLock<HashMap<String, String>>>,
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    budget_audits: Arc<RwLock<HashMap<String, Vec<BudgetAudit>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            profiles_by_email: Arc::new(RwLock::new(HashMap::new())),
            budgets: Arc::new(RwLock::new(HashMap::new())),
            budgets_by_join_code: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            budget_audits: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_profile(&self, profile: Profile) -> Result<Profile, BudgetError> {
        let mut by_email = self.profiles_by_email.write().await;
        if by_email.contains_key(&profile.email) {
            return Err(BudgetError::EmailAlreadyRegistered(profile.email));
        }
        by_email.insert(profile.email.clone(), profile.id.clone());
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, BudgetError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, BudgetError> {
        let user_id = self.profiles_by_email.read().await.get(email).cloned();
        Ok(match user_id {
            Some(id) => self.profiles.read().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn update_profile(&self, profile: Profile) -> Result<Profile, BudgetError> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id) {
            return Err(BudgetError::ProfileNotFound(profile.id));
        }
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn save_budget(&self, budget: Budget) -> Result<(), BudgetError> {
        let mut budgets = self.budgets.write().await;
        let mut by_join_code = self.budgets_by_join_code.write().await;
        by_join_code.insert(budget.join_code.clone(), budget.id.clone());
        budgets.insert(budget.id.clone(), budget);
        Ok(())
    }

    async fn get_budget(&self, budget_id: &str) -> Result<Option<Budget>, BudgetError> {
        let budgets = self.budgets.read().await;
        Ok(budgets.get(budget_id).cloned())
    }

    async fn get_budget_by_join_code(&self, join_code: &str) -> Result<Option<Budget>, BudgetError> {
        let budget_id = self.budgets_by_join_code.read().await.get(join_code).cloned();
        Ok(match budget_id {
            Some(id) => self.budgets.read().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn delete_budget(&self, budget_id: &str) -> Result<(), BudgetError> {
        let mut budgets = self.budgets.write().await;
        if let Some(budget) = budgets.remove(budget_id) {
            let mut by_join_code = self.budgets_by_join_code.write().await;
            by_join_code.remove(&budget.join_code);
        }
        Ok(())
    }

    async fn get_user_budgets(&self, user_id: &str) -> Result<Vec<Budget>, BudgetError> {
        let budgets = self.budgets.read().await;
        Ok(budgets
            .values()
            .filter(|b| b.members.iter().any(|m| m.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), BudgetError> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, BudgetError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(transaction_id).cloned())
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), BudgetError> {
        let mut transactions = self.transactions.write().await;
        transactions.remove(transaction_id);
        Ok(())
    }

    async fn delete_transactions_by_budget(&self, budget_id: &str) -> Result<(), BudgetError> {
        let mut transactions = self.transactions.write().await;
        transactions.retain(|_, tx| tx.budget_id != budget_id);
        Ok(())
    }

    async fn get_transactions_by_budget(&self, budget_id: &str) -> Result<Vec<Transaction>, BudgetError> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .filter(|tx| tx.budget_id == budget_id)
            .cloned()
            .collect())
    }

    async fn save_budget_audit(&self, audit: BudgetAudit) -> Result<(), BudgetError> {
        let mut audits = self.budget_audits.write().await;
        audits.entry(audit.budget_id.clone()).or_default().push(audit);
        Ok(())
    }

    async fn get_budget_audits(&self, budget_id: &str) -> Result<Vec<BudgetAudit>, BudgetError> {
        let audits = self.budget_audits.read().await;
        Ok(audits.get(budget_id).cloned().unwrap_or_default())
    }
}
