use crate::analytics::{self, AnalyticsSummary, TimeRange};
use crate::constants::{
    ANALYTICS_QUERIED, BUDGET_CREATED, BUDGET_CURRENCY_UPDATED, BUDGET_DELETED, DEBTS_QUERIED, JOIN_CODE_LENGTH,
    JOIN_REQUESTED, MAX_AMOUNT, MAX_CURRENCY_LENGTH, MAX_NAME_LENGTH, MAX_NOTE_LENGTH, MEMBER_REMOVED,
    MEMBER_ROLE_UPDATED, MEMBER_STATUS_UPDATED, PROFILE_CREATED, PROFILE_UPDATED, TRANSACTION_ADDED,
    TRANSACTION_DELETED,
};
use crate::error::{BudgetError, FieldError};
use crate::logger::LoggingService;
use crate::models::{
    Budget, BudgetAudit, BudgetMode, Category, Member, MemberRole, MemberStatus, Profile, SplitPolicy, Transaction,
    TransactionKind,
};
use crate::reconcile::{self, DebtReport};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

pub struct BudgetService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
}

impl<L: LoggingService, S: Storage> BudgetService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        BudgetService { storage, logging }
    }

    async fn validate_profiles(&self, user_ids: &[&str]) -> Result<(), BudgetError> {
        for &user_id in user_ids {
            if self.storage.get_profile(user_id).await?.is_none() {
                return Err(BudgetError::ProfileNotFound(user_id.to_string()));
            }
        }
        Ok(())
    }

    async fn validate_budget_and_owner(&self, budget_id: &str, owner_id: &str) -> Result<Budget, BudgetError> {
        let budget = self
            .storage
            .get_budget(budget_id)
            .await?
            .ok_or_else(|| BudgetError::BudgetNotFound(budget_id.to_string()))?;
        if !budget.member(owner_id).map(Member::is_owner).unwrap_or(false) {
            return Err(BudgetError::NotBudgetOwner(owner_id.to_string()));
        }
        Ok(budget)
    }

    async fn validate_budget_membership(&self, budget_id: &str, user_id: &str) -> Result<Budget, BudgetError> {
        let budget = self
            .storage
            .get_budget(budget_id)
            .await?
            .ok_or_else(|| BudgetError::BudgetNotFound(budget_id.to_string()))?;
        if budget.accepted_member(user_id).is_none() {
            return Err(BudgetError::NotBudgetMember(user_id.to_string()));
        }
        Ok(budget)
    }

    fn validate_can_edit(&self, budget: &Budget, user_id: &str) -> Result<(), BudgetError> {
        let member = budget
            .accepted_member(user_id)
            .ok_or_else(|| BudgetError::NotBudgetMember(user_id.to_string()))?;
        if member.role == MemberRole::Viewer {
            return Err(BudgetError::ViewerCannotEdit(user_id.to_string()));
        }
        Ok(())
    }

    async fn log_and_audit(
        &self,
        budget_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), BudgetError> {
        self.logging.log_action(action, log_details.clone(), user_id).await?;
        if let Some(bid) = budget_id {
            self.storage
                .save_budget_audit(BudgetAudit {
                    id: Uuid::new_v4().to_string(),
                    budget_id: bid.to_string(),
                    action: action.to_string(),
                    user_id: user_id.map(String::from),
                    details: serde_json::from_value(log_details).unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), BudgetError> {
        if value.trim().is_empty() {
            return Err(BudgetError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.len() > max_length {
            return Err(BudgetError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(BudgetError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), BudgetError> {
        if !amount.is_finite() {
            return Err(BudgetError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be a finite number".to_string(),
                },
            ));
        }
        if amount <= 0.0 {
            return Err(BudgetError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be greater than 0".to_string(),
                },
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(BudgetError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: format!("Amount cannot exceed {}", MAX_AMOUNT),
                },
            ));
        }
        if (amount * 100.0).fract() != 0.0 {
            return Err(BudgetError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount cannot have more than 2 decimal places".to_string(),
                },
            ));
        }
        Ok(())
    }

    fn generate_join_code() -> String {
        let raw = Uuid::new_v4().simple().to_string();
        raw[..JOIN_CODE_LENGTH].to_uppercase()
    }

    // PROFILES

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, BudgetError> {
        self.storage.get_profile(user_id).await
    }

    pub async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, BudgetError> {
        self.storage.get_profile_by_email(email).await
    }

    pub async fn create_profile(
        &self,
        display_name: String,
        email: String,
        photo_url: Option<String>,
        default_currency: String,
    ) -> Result<Profile, BudgetError> {
        if email.is_empty() {
            return Err(BudgetError::MissingEmail);
        }
        if !email.contains('@') || !email.contains('.') || email.len() < 5 {
            return Err(BudgetError::InvalidEmail(email));
        }
        self.validate_string_input("display_name", &display_name, MAX_NAME_LENGTH)?;
        self.validate_string_input("default_currency", &default_currency, MAX_CURRENCY_LENGTH)?;

        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            display_name,
            email,
            photo_url,
            default_currency,
        };
        let created = self.storage.create_profile(profile).await?;

        self.log_and_audit(
            None,
            PROFILE_CREATED,
            json!({ "user_id": created.id, "display_name": created.display_name, "email": created.email }),
            Some(created.id.as_str()),
        )
        .await?;

        Ok(created)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        display_name: String,
        photo_url: Option<String>,
        default_currency: String,
    ) -> Result<Profile, BudgetError> {
        let mut profile = self
            .storage
            .get_profile(user_id)
            .await?
            .ok_or_else(|| BudgetError::ProfileNotFound(user_id.to_string()))?;

        self.validate_string_input("display_name", &display_name, MAX_NAME_LENGTH)?;
        self.validate_string_input("default_currency", &default_currency, MAX_CURRENCY_LENGTH)?;

        profile.display_name = display_name;
        profile.photo_url = photo_url;
        profile.default_currency = default_currency;
        let updated = self.storage.update_profile(profile).await?;

        self.log_and_audit(
            None,
            PROFILE_UPDATED,
            json!({ "user_id": updated.id, "display_name": updated.display_name }),
            Some(user_id),
        )
        .await?;

        Ok(updated)
    }

    // BUDGETS

    pub async fn create_budget(
        &self,
        name: String,
        mode: BudgetMode,
        currency: String,
        owner: &Profile,
    ) -> Result<Budget, BudgetError> {
        self.validate_profiles(&[&owner.id]).await?;
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        self.validate_string_input("currency", &currency, MAX_CURRENCY_LENGTH)?;

        let now = Utc::now();
        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            name,
            owner_id: owner.id.clone(),
            mode,
            currency,
            join_code: Self::generate_join_code(),
            members: vec![Member {
                user_id: owner.id.clone(),
                role: MemberRole::Owner,
                status: MemberStatus::Accepted,
                joined_at: now,
            }],
            created_at: now,
        };

        self.storage.save_budget(budget.clone()).await?;

        self.log_and_audit(
            Some(&budget.id),
            BUDGET_CREATED,
            json!({
                "budget_id": budget.id,
                "name": budget.name,
                "mode": budget.mode,
                "currency": budget.currency,
                "join_code": budget.join_code
            }),
            Some(owner.id.as_str()),
        )
        .await?;

        Ok(budget)
    }

    pub async fn get_budget(&self, budget_id: &str, queried_by: &Profile) -> Result<Budget, BudgetError> {
        self.validate_budget_membership(budget_id, &queried_by.id).await
    }

    pub async fn get_user_budgets(&self, user_id: &str) -> Result<Vec<Budget>, BudgetError> {
        self.validate_profiles(&[user_id]).await?;
        let mut budgets = self.storage.get_user_budgets(user_id).await?;
        budgets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(budgets)
    }

    pub async fn delete_budget(&self, budget_id: &str, deleted_by: &Profile) -> Result<(), BudgetError> {
        let budget = self.validate_budget_and_owner(budget_id, &deleted_by.id).await?;

        // Transactions first so a failed delete never leaves orphans pointing
        // at a missing budget.
        self.storage.delete_transactions_by_budget(budget_id).await?;
        self.storage.delete_budget(budget_id).await?;

        self.log_and_audit(
            Some(budget_id),
            BUDGET_DELETED,
            json!({ "budget_id": budget_id, "name": budget.name }),
            Some(deleted_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn update_budget_currency(
        &self,
        budget_id: &str,
        currency: String,
        updated_by: &Profile,
    ) -> Result<Budget, BudgetError> {
        let mut budget = self.validate_budget_and_owner(budget_id, &updated_by.id).await?;
        self.validate_string_input("currency", &currency, MAX_CURRENCY_LENGTH)?;

        budget.currency = currency;
        self.storage.save_budget(budget.clone()).await?;

        self.log_and_audit(
            Some(budget_id),
            BUDGET_CURRENCY_UPDATED,
            json!({ "budget_id": budget_id, "currency": budget.currency }),
            Some(updated_by.id.as_str()),
        )
        .await?;

        Ok(budget)
    }

    // MEMBERSHIP

    pub async fn join_budget_by_code(&self, join_code: &str, user: &Profile) -> Result<Member, BudgetError> {
        self.validate_string_input("join_code", join_code, JOIN_CODE_LENGTH)?;
        self.validate_profiles(&[&user.id]).await?;

        let mut budget = self
            .storage
            .get_budget_by_join_code(join_code)
            .await?
            .ok_or(BudgetError::JoinCodeNotFound)?;

        if budget.owner_id == user.id {
            return Err(BudgetError::OwnerCannotJoin(user.id.clone()));
        }
        if let Some(existing) = budget.member(&user.id) {
            match existing.status {
                MemberStatus::Accepted => return Err(BudgetError::AlreadyBudgetMember(user.id.clone())),
                MemberStatus::Pending => return Err(BudgetError::JoinRequestPending(user.id.clone())),
                // A previously rejected user may request again.
                MemberStatus::Rejected => {}
            }
        }

        budget.members.retain(|m| m.user_id != user.id);
        let membership = Member {
            user_id: user.id.clone(),
            role: MemberRole::Viewer,
            status: MemberStatus::Pending,
            joined_at: Utc::now(),
        };
        budget.members.push(membership.clone());
        self.storage.save_budget(budget.clone()).await?;

        self.log_and_audit(
            Some(&budget.id),
            JOIN_REQUESTED,
            json!({ "budget_id": budget.id, "user_id": user.id }),
            Some(user.id.as_str()),
        )
        .await?;

        Ok(membership)
    }

    pub async fn update_member_status(
        &self,
        budget_id: &str,
        member_id: &str,
        status: MemberStatus,
        updated_by: &Profile,
    ) -> Result<(), BudgetError> {
        let mut budget = self.validate_budget_and_owner(budget_id, &updated_by.id).await?;

        if status == MemberStatus::Pending {
            return Err(BudgetError::InvalidInput(
                "status".to_string(),
                FieldError {
                    field: "status".to_string(),
                    title: "Invalid Status".to_string(),
                    description: "A request can only be accepted or rejected".to_string(),
                },
            ));
        }
        if member_id == budget.owner_id {
            return Err(BudgetError::CannotModifyOwner);
        }
        if budget.member(member_id).is_none() {
            return Err(BudgetError::MembershipNotFound(member_id.to_string()));
        }

        match status {
            MemberStatus::Accepted => {
                for member in budget.members.iter_mut() {
                    if member.user_id == member_id {
                        member.status = MemberStatus::Accepted;
                    }
                }
            }
            // Rejection removes the membership row entirely.
            _ => budget.members.retain(|m| m.user_id != member_id),
        }
        self.storage.save_budget(budget.clone()).await?;

        self.log_and_audit(
            Some(budget_id),
            MEMBER_STATUS_UPDATED,
            json!({ "budget_id": budget_id, "user_id": member_id, "status": status }),
            Some(updated_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn update_member_role(
        &self,
        budget_id: &str,
        member_id: &str,
        role: MemberRole,
        updated_by: &Profile,
    ) -> Result<(), BudgetError> {
        let mut budget = self.validate_budget_and_owner(budget_id, &updated_by.id).await?;

        if role == MemberRole::Owner || member_id == budget.owner_id {
            return Err(BudgetError::CannotModifyOwner);
        }
        if budget.member(member_id).is_none() {
            return Err(BudgetError::MembershipNotFound(member_id.to_string()));
        }

        for member in budget.members.iter_mut() {
            if member.user_id == member_id {
                member.role = role;
            }
        }
        self.storage.save_budget(budget.clone()).await?;

        self.log_and_audit(
            Some(budget_id),
            MEMBER_ROLE_UPDATED,
            json!({ "budget_id": budget_id, "user_id": member_id, "role": role }),
            Some(updated_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_member(
        &self,
        budget_id: &str,
        member_id: &str,
        removed_by: &Profile,
    ) -> Result<(), BudgetError> {
        let mut budget = self.validate_budget_and_owner(budget_id, &removed_by.id).await?;

        if member_id == budget.owner_id {
            return Err(BudgetError::CannotModifyOwner);
        }
        if budget.member(member_id).is_none() {
            return Err(BudgetError::MembershipNotFound(member_id.to_string()));
        }

        budget.members.retain(|m| m.user_id != member_id);
        self.storage.save_budget(budget.clone()).await?;

        self.log_and_audit(
            Some(budget_id),
            MEMBER_REMOVED,
            json!({ "budget_id": budget_id, "user_id": member_id }),
            Some(removed_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    // TRANSACTIONS

    #[allow(clippy::too_many_arguments)]
    pub async fn add_transaction(
        &self,
        budget_id: &str,
        author: &Profile,
        payer_id: Option<String>,
        amount: f64,
        kind: TransactionKind,
        category: Category,
        participant_ids: Vec<String>,
        date: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<Transaction, BudgetError> {
        let budget = self.validate_budget_membership(budget_id, &author.id).await?;
        self.validate_can_edit(&budget, &author.id)?;
        self.validate_amount_input("amount", amount)?;

        if category.kind() != kind {
            return Err(BudgetError::CategoryKindMismatch(
                category.to_string(),
                match kind {
                    TransactionKind::Income => "income".to_string(),
                    TransactionKind::Expense => "expense".to_string(),
                },
            ));
        }
        if let Some(note) = note.as_deref() {
            self.validate_string_input("note", note, MAX_NOTE_LENGTH)?;
        }
        if let Some(payer) = payer_id.as_deref() {
            if budget.accepted_member(payer).is_none() {
                return Err(BudgetError::NotBudgetMember(payer.to_string()));
            }
        }
        if !participant_ids.is_empty() {
            if budget.mode != BudgetMode::Sharing || kind != TransactionKind::Expense {
                return Err(BudgetError::InvalidInput(
                    "participant_ids".to_string(),
                    FieldError {
                        field: "participant_ids".to_string(),
                        title: "Invalid Participants".to_string(),
                        description: "Participants only apply to expenses in sharing-mode budgets".to_string(),
                    },
                ));
            }
            for participant in &participant_ids {
                if budget.accepted_member(participant).is_none() {
                    return Err(BudgetError::InvalidParticipant(participant.clone()));
                }
            }
        }

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            budget_id: budget_id.to_string(),
            author_id: author.id.clone(),
            payer_id,
            amount,
            kind,
            category,
            split: SplitPolicy::from_participants(participant_ids),
            date,
            note,
            created_at: Utc::now(),
        };
        self.storage.save_transaction(transaction.clone()).await?;

        self.log_and_audit(
            Some(budget_id),
            TRANSACTION_ADDED,
            json!({
                "transaction_id": transaction.id,
                "budget_id": budget_id,
                "amount": transaction.amount,
                "kind": transaction.kind,
                "category": transaction.category,
                "payer_id": transaction.payer_id
            }),
            Some(author.id.as_str()),
        )
        .await?;

        Ok(transaction)
    }

    pub async fn delete_transaction(&self, transaction_id: &str, deleted_by: &Profile) -> Result<(), BudgetError> {
        let transaction = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| BudgetError::TransactionNotFound(transaction_id.to_string()))?;

        let budget = self
            .validate_budget_membership(&transaction.budget_id, &deleted_by.id)
            .await?;
        self.validate_can_edit(&budget, &deleted_by.id)?;

        self.storage.delete_transaction(transaction_id).await?;

        self.log_and_audit(
            Some(&transaction.budget_id),
            TRANSACTION_DELETED,
            json!({ "transaction_id": transaction_id, "budget_id": transaction.budget_id }),
            Some(deleted_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn get_transactions(&self, budget_id: &str, queried_by: &Profile) -> Result<Vec<Transaction>, BudgetError> {
        self.validate_budget_membership(budget_id, &queried_by.id).await?;
        let mut transactions = self.storage.get_transactions_by_budget(budget_id).await?;
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(transactions)
    }

    // DEBTS & ANALYTICS

    pub async fn get_debt_summary(&self, budget_id: &str, queried_by: &Profile) -> Result<DebtReport, BudgetError> {
        let budget = self.validate_budget_membership(budget_id, &queried_by.id).await?;
        if budget.mode != BudgetMode::Sharing {
            return Err(BudgetError::NotSharingBudget(budget_id.to_string()));
        }

        let transactions = self.storage.get_transactions_by_budget(budget_id).await?;
        let report = reconcile::reconcile(&budget.members, &transactions)?;

        self.log_and_audit(
            None,
            DEBTS_QUERIED,
            json!({ "budget_id": budget_id, "transfers": report.transfers.len() }),
            Some(queried_by.id.as_str()),
        )
        .await?;

        Ok(report)
    }

    pub async fn get_analytics(
        &self,
        budget_id: &str,
        range: TimeRange,
        queried_by: &Profile,
    ) -> Result<AnalyticsSummary, BudgetError> {
        self.validate_budget_membership(budget_id, &queried_by.id).await?;
        let transactions = self.storage.get_transactions_by_budget(budget_id).await?;

        // Category totals honor the selected window; the trend and the
        // contribution table always cover the full history.
        let windowed = analytics::filter_by_range(&transactions, range, Utc::now());
        let summary = AnalyticsSummary {
            range,
            categories: analytics::category_breakdown(&windowed),
            trend: analytics::balance_trend(&transactions),
            contributions: analytics::member_contributions(&transactions),
        };

        self.log_and_audit(
            None,
            ANALYTICS_QUERIED,
            json!({ "budget_id": budget_id, "range": range }),
            Some(queried_by.id.as_str()),
        )
        .await?;

        Ok(summary)
    }

    // AUDIT TRAIL

    pub async fn get_app_logs(&self) -> Result<Vec<crate::models::AppLog>, BudgetError> {
        self.logging.get_logs().await
    }

    pub async fn get_budget_audits(&self, budget_id: &str) -> Result<Vec<BudgetAudit>, BudgetError> {
        self.storage.get_budget_audits(budget_id).await
    }
}
