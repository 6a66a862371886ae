use crate::{
    api::models::*,
    error::BudgetError,
    logger::in_memory::InMemoryLogging,
    models::{AppLog, Budget, BudgetAudit, Member, Profile, Transaction},
    analytics::AnalyticsSummary,
    service::BudgetService,
    storage::in_memory::InMemoryStorage,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;

pub type AppService = Arc<BudgetService<InMemoryLogging, InMemoryStorage>>;

// Newtype wrapper for BudgetError to implement IntoResponse
pub struct ApiError(BudgetError);

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            BudgetError::MissingEmail
            | BudgetError::InvalidEmail(_)
            | BudgetError::InvalidInput(_, _)
            | BudgetError::CategoryKindMismatch(_, _)
            | BudgetError::InvalidParticipant(_)
            | BudgetError::NotSharingBudget(_) => StatusCode::BAD_REQUEST,
            BudgetError::EmailAlreadyRegistered(_)
            | BudgetError::AlreadyBudgetMember(_)
            | BudgetError::JoinRequestPending(_) => StatusCode::CONFLICT,
            BudgetError::ProfileNotFound(_)
            | BudgetError::BudgetNotFound(_)
            | BudgetError::TransactionNotFound(_)
            | BudgetError::MembershipNotFound(_)
            | BudgetError::JoinCodeNotFound => StatusCode::NOT_FOUND,
            BudgetError::NotBudgetMember(_)
            | BudgetError::NotBudgetOwner(_)
            | BudgetError::ViewerCannotEdit(_)
            | BudgetError::CannotModifyOwner
            | BudgetError::OwnerCannotJoin(_) => StatusCode::FORBIDDEN,
            BudgetError::InternalServerError(_)
            | BudgetError::StorageError(_)
            | BudgetError::LoggingError(_)
            | BudgetError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn resolve_profile(service: &AppService, user_id: &str) -> Result<Profile, ApiError> {
    Ok(service
        .get_profile(user_id)
        .await?
        .ok_or_else(|| BudgetError::ProfileNotFound(user_id.to_string()))?)
}

pub fn api_routes(service: AppService) -> Router {
    Router::new()
        .route("/profiles", post(create_profile))
        .route("/profiles/{user_id}", get(get_profile).post(update_profile))
        .route("/budgets", post(create_budget))
        .route("/budgets/join", post(join_budget))
        .route("/budgets/{budget_id}", get(get_budget).delete(delete_budget))
        .route("/budgets/{budget_id}/currency", post(update_budget_currency))
        .route("/budgets/{budget_id}/members/status", post(update_member_status))
        .route("/budgets/{budget_id}/members/role", post(update_member_role))
        .route("/budgets/{budget_id}/members/remove", post(remove_member))
        .route("/budgets/{budget_id}/debts", post(get_debt_summary))
        .route("/budgets/{budget_id}/analytics", post(get_analytics))
        .route("/budgets/{budget_id}/audits", get(get_budget_audits))
        .route("/users/{user_id}/budgets", get(get_user_budgets))
        .route("/transactions", post(add_transaction))
        .route("/transactions/delete", post(delete_transaction))
        .route("/transactions/list", post(list_transactions))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn create_profile(
    State(service): State<AppService>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let profile = service
        .create_profile(req.display_name, req.email, req.photo_url, req.default_currency)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    get,
    path = "/api/profiles/{user_id}",
    params(("user_id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(service): State<AppService>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = resolve_profile(&service, &user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/profiles/{user_id}",
    params(("user_id" = String, Path, description = "Profile id")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(service): State<AppService>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let profile = service
        .update_profile(&user_id, req.display_name, req.photo_url, req.default_currency)
        .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/budgets",
    request_body = CreateBudgetRequest,
    responses(
        (status = 200, description = "Budget created", body = Budget),
        (status = 404, description = "Owner profile not found", body = ErrorResponse)
    )
)]
pub async fn create_budget(
    State(service): State<AppService>,
    Json(req): Json<CreateBudgetRequest>,
) -> Result<Json<Budget>, ApiError> {
    let owner = resolve_profile(&service, &req.owner_id).await?;
    let budget = service.create_budget(req.name, req.mode, req.currency, &owner).await?;
    Ok(Json(budget))
}

#[utoipa::path(
    get,
    path = "/api/budgets/{budget_id}",
    params(
        ("budget_id" = String, Path, description = "Budget id"),
        GetBudgetQuery
    ),
    responses(
        (status = 200, description = "Budget found", body = Budget),
        (status = 403, description = "Not a budget member", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn get_budget(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Query(query): Query<GetBudgetQuery>,
) -> Result<Json<Budget>, ApiError> {
    let queried_by = resolve_profile(&service, &query.queried_by_id).await?;
    let budget = service.get_budget(&budget_id, &queried_by).await?;
    Ok(Json(budget))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{budget_id}",
    params(("budget_id" = String, Path, description = "Budget id")),
    request_body = DeleteBudgetRequest,
    responses(
        (status = 200, description = "Budget deleted"),
        (status = 403, description = "Not the budget owner", body = ErrorResponse)
    )
)]
pub async fn delete_budget(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Json(req): Json<DeleteBudgetRequest>,
) -> Result<StatusCode, ApiError> {
    let deleted_by = resolve_profile(&service, &req.deleted_by_id).await?;
    service.delete_budget(&budget_id, &deleted_by).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/budgets",
    params(("user_id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Budgets the user belongs to", body = [Budget]),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn get_user_budgets(
    State(service): State<AppService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Budget>>, ApiError> {
    let budgets = service.get_user_budgets(&user_id).await?;
    Ok(Json(budgets))
}

#[utoipa::path(
    post,
    path = "/api/budgets/{budget_id}/currency",
    params(("budget_id" = String, Path, description = "Budget id")),
    request_body = UpdateCurrencyRequest,
    responses(
        (status = 200, description = "Currency updated", body = Budget),
        (status = 403, description = "Not the budget owner", body = ErrorResponse)
    )
)]
pub async fn update_budget_currency(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Json(req): Json<UpdateCurrencyRequest>,
) -> Result<Json<Budget>, ApiError> {
    let updated_by = resolve_profile(&service, &req.updated_by_id).await?;
    let budget = service.update_budget_currency(&budget_id, req.currency, &updated_by).await?;
    Ok(Json(budget))
}

#[utoipa::path(
    post,
    path = "/api/budgets/join",
    request_body = JoinBudgetRequest,
    responses(
        (status = 200, description = "Join request created", body = Member),
        (status = 404, description = "Join code not found", body = ErrorResponse),
        (status = 409, description = "Already a member or request pending", body = ErrorResponse)
    )
)]
pub async fn join_budget(
    State(service): State<AppService>,
    Json(req): Json<JoinBudgetRequest>,
) -> Result<Json<Member>, ApiError> {
    let user = resolve_profile(&service, &req.user_id).await?;
    let membership = service.join_budget_by_code(&req.join_code, &user).await?;
    Ok(Json(membership))
}

#[utoipa::path(
    post,
    path = "/api/budgets/{budget_id}/members/status",
    params(("budget_id" = String, Path, description = "Budget id")),
    request_body = UpdateMemberStatusRequest,
    responses(
        (status = 200, description = "Membership status updated"),
        (status = 403, description = "Not the budget owner", body = ErrorResponse)
    )
)]
pub async fn update_member_status(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Json(req): Json<UpdateMemberStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let updated_by = resolve_profile(&service, &req.updated_by_id).await?;
    service
        .update_member_status(&budget_id, &req.member_id, req.status, &updated_by)
        .await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/budgets/{budget_id}/members/role",
    params(("budget_id" = String, Path, description = "Budget id")),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Member role updated"),
        (status = 403, description = "Not the budget owner", body = ErrorResponse)
    )
)]
pub async fn update_member_role(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> Result<StatusCode, ApiError> {
    let updated_by = resolve_profile(&service, &req.updated_by_id).await?;
    service
        .update_member_role(&budget_id, &req.member_id, req.role, &updated_by)
        .await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/budgets/{budget_id}/members/remove",
    params(("budget_id" = String, Path, description = "Budget id")),
    request_body = RemoveMemberRequest,
    responses(
        (status = 200, description = "Member removed"),
        (status = 403, description = "Not the budget owner", body = ErrorResponse)
    )
)]
pub async fn remove_member(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Json(req): Json<RemoveMemberRequest>,
) -> Result<StatusCode, ApiError> {
    let removed_by = resolve_profile(&service, &req.removed_by_id).await?;
    service.remove_member(&budget_id, &req.member_id, &removed_by).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = AddTransactionRequest,
    responses(
        (status = 200, description = "Transaction added", body = Transaction),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "No permission to edit", body = ErrorResponse)
    )
)]
pub async fn add_transaction(
    State(service): State<AppService>,
    Json(req): Json<AddTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let author = resolve_profile(&service, &req.author_id).await?;
    let transaction = service
        .add_transaction(
            &req.budget_id,
            &author,
            req.payer_id,
            req.amount,
            req.kind,
            req.category,
            req.participant_ids,
            req.date,
            req.note,
        )
        .await?;
    Ok(Json(transaction))
}

#[utoipa::path(
    post,
    path = "/api/transactions/delete",
    request_body = DeleteTransactionRequest,
    responses(
        (status = 200, description = "Transaction deleted"),
        (status = 403, description = "No permission to edit", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
pub async fn delete_transaction(
    State(service): State<AppService>,
    Json(req): Json<DeleteTransactionRequest>,
) -> Result<StatusCode, ApiError> {
    let deleted_by = resolve_profile(&service, &req.deleted_by_id).await?;
    service.delete_transaction(&req.transaction_id, &deleted_by).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/transactions/list",
    request_body = ListTransactionsRequest,
    responses(
        (status = 200, description = "Budget transactions, newest first", body = [Transaction]),
        (status = 403, description = "Not a budget member", body = ErrorResponse)
    )
)]
pub async fn list_transactions(
    State(service): State<AppService>,
    Json(req): Json<ListTransactionsRequest>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let queried_by = resolve_profile(&service, &req.queried_by_id).await?;
    let transactions = service.get_transactions(&req.budget_id, &queried_by).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    post,
    path = "/api/budgets/{budget_id}/debts",
    params(("budget_id" = String, Path, description = "Budget id")),
    request_body = DebtSummaryRequest,
    responses(
        (status = 200, description = "Debt reconciliation report", body = DebtSummaryResponse),
        (status = 400, description = "Budget is not in sharing mode", body = ErrorResponse),
        (status = 403, description = "Not a budget member", body = ErrorResponse)
    )
)]
pub async fn get_debt_summary(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Json(req): Json<DebtSummaryRequest>,
) -> Result<Json<DebtSummaryResponse>, ApiError> {
    let queried_by = resolve_profile(&service, &req.queried_by_id).await?;
    let budget = service.get_budget(&budget_id, &queried_by).await?;
    let report = service.get_debt_summary(&budget_id, &queried_by).await?;

    let members = budget
        .members
        .iter()
        .filter(|m| m.is_accepted())
        .map(|m| resolve_profile(&service, &m.user_id))
        .collect::<Vec<_>>();
    let members = futures::future::try_join_all(members).await?;

    Ok(Json(DebtSummaryResponse { report, members }))
}

#[utoipa::path(
    post,
    path = "/api/budgets/{budget_id}/analytics",
    params(("budget_id" = String, Path, description = "Budget id")),
    request_body = AnalyticsRequest,
    responses(
        (status = 200, description = "Aggregated analytics", body = AnalyticsSummary),
        (status = 403, description = "Not a budget member", body = ErrorResponse)
    )
)]
pub async fn get_analytics(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
    Json(req): Json<AnalyticsRequest>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let queried_by = resolve_profile(&service, &req.queried_by_id).await?;
    let summary = service.get_analytics(&budget_id, req.range, &queried_by).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses((status = 200, description = "Application logs", body = [AppLog]))
)]
pub async fn get_app_logs(State(service): State<AppService>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs().await?;
    Ok(Json(logs))
}

#[utoipa::path(
    get,
    path = "/api/budgets/{budget_id}/audits",
    params(("budget_id" = String, Path, description = "Budget id")),
    responses((status = 200, description = "Budget audit trail", body = [BudgetAudit]))
)]
pub async fn get_budget_audits(
    State(service): State<AppService>,
    Path(budget_id): Path<String>,
) -> Result<Json<Vec<BudgetAudit>>, ApiError> {
    let audits = service.get_budget_audits(&budget_id).await?;
    Ok(Json(audits))
}
