use utoipa::OpenApi;

use crate::{
    analytics::{AnalyticsSummary, CategoryTotal, MemberContribution, TimeRange, TrendPoint},
    api::models::{
        AddTransactionRequest, AnalyticsRequest, CreateBudgetRequest, CreateProfileRequest, DebtSummaryRequest,
        DebtSummaryResponse, DeleteBudgetRequest, DeleteTransactionRequest, ErrorResponse, JoinBudgetRequest,
        ListTransactionsRequest, RemoveMemberRequest, UpdateCurrencyRequest, UpdateMemberRoleRequest,
        UpdateMemberStatusRequest, UpdateProfileRequest,
    },
    models::{AppLog, Budget, BudgetAudit, BudgetMode, Category, Member, MemberRole, MemberStatus, Profile,
        SplitPolicy, Transaction, TransactionKind},
    reconcile::{DebtReport, Transfer},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_profile,
        super::handlers::get_profile,
        super::handlers::update_profile,
        super::handlers::create_budget,
        super::handlers::get_budget,
        super::handlers::delete_budget,
        super::handlers::get_user_budgets,
        super::handlers::update_budget_currency,
        super::handlers::join_budget,
        super::handlers::update_member_status,
        super::handlers::update_member_role,
        super::handlers::remove_member,
        super::handlers::add_transaction,
        super::handlers::delete_transaction,
        super::handlers::list_transactions,
        super::handlers::get_debt_summary,
        super::handlers::get_analytics,
        super::handlers::get_app_logs,
        super::handlers::get_budget_audits
    ),
    components(schemas(
        CreateProfileRequest,
        UpdateProfileRequest,
        CreateBudgetRequest,
        DeleteBudgetRequest,
        UpdateCurrencyRequest,
        JoinBudgetRequest,
        UpdateMemberStatusRequest,
        UpdateMemberRoleRequest,
        RemoveMemberRequest,
        AddTransactionRequest,
        DeleteTransactionRequest,
        ListTransactionsRequest,
        DebtSummaryRequest,
        AnalyticsRequest,
        DebtSummaryResponse,
        ErrorResponse,
        Profile,
        Budget,
        BudgetMode,
        Member,
        MemberRole,
        MemberStatus,
        Transaction,
        TransactionKind,
        Category,
        SplitPolicy,
        DebtReport,
        Transfer,
        AnalyticsSummary,
        CategoryTotal,
        TrendPoint,
        MemberContribution,
        TimeRange,
        AppLog,
        BudgetAudit
    )),
    info(
        title = "Budgetmate API",
        description = "API for budget tracking, shared expenses and debt settlement",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
