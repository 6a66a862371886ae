use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::analytics::TimeRange;
use crate::models::{BudgetMode, Category, MemberRole, MemberStatus, Profile, TransactionKind};
use crate::reconcile::DebtReport;

#[derive(Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub default_currency: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub display_name: String,
    pub photo_url: Option<String>,
    pub default_currency: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateBudgetRequest {
    pub name: String,
    pub mode: BudgetMode,
    pub currency: String,
    pub owner_id: String,
}

#[derive(Deserialize, IntoParams)]
pub struct GetBudgetQuery {
    pub queried_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteBudgetRequest {
    pub deleted_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateCurrencyRequest {
    pub currency: String,
    pub updated_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct JoinBudgetRequest {
    pub join_code: String,
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateMemberStatusRequest {
    pub member_id: String,
    pub status: MemberStatus,
    pub updated_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateMemberRoleRequest {
    pub member_id: String,
    pub role: MemberRole,
    pub updated_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RemoveMemberRequest {
    pub member_id: String,
    pub removed_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddTransactionRequest {
    pub budget_id: String,
    pub author_id: String,
    pub payer_id: Option<String>,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Category,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteTransactionRequest {
    pub transaction_id: String,
    pub deleted_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ListTransactionsRequest {
    pub budget_id: String,
    pub queried_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DebtSummaryRequest {
    pub queried_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AnalyticsRequest {
    pub queried_by_id: String,
    pub range: TimeRange,
}

#[derive(Serialize, ToSchema)]
pub struct DebtSummaryResponse {
    pub report: DebtReport,
    /// Profiles of the accepted members, for rendering names next to ids.
    pub members: Vec<Profile>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
