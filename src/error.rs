use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum BudgetError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Profile {0} not found")]
    ProfileNotFound(String),

    #[error("Budget {0} not found")]
    BudgetNotFound(String),

    #[error("User {0} is not an accepted budget member")]
    NotBudgetMember(String),

    #[error("User {0} is not the budget owner")]
    NotBudgetOwner(String),

    #[error("User {0} is already a budget member")]
    AlreadyBudgetMember(String),

    #[error("User {0} already has a pending join request")]
    JoinRequestPending(String),

    #[error("User {0} owns this budget")]
    OwnerCannotJoin(String),

    #[error("Join code not found")]
    JoinCodeNotFound,

    #[error("No membership found for user {0}")]
    MembershipNotFound(String),

    #[error("The owner's membership cannot be changed")]
    CannotModifyOwner,

    #[error("User {0} does not have permission to edit this budget")]
    ViewerCannotEdit(String),

    #[error("Transaction {0} not found")]
    TransactionNotFound(String),

    #[error("Budget {0} is not in sharing mode")]
    NotSharingBudget(String),

    #[error("User {0} is not an accepted member and cannot participate in a split")]
    InvalidParticipant(String),

    #[error("Category {0} cannot be used for a {1} transaction")]
    CategoryKindMismatch(String, String),

    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}
