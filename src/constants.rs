/// Residual balances below this are treated as settled and never produce a
/// transfer.
pub const SETTLE_EPSILON: f64 = 0.01;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_NOTE_LENGTH: usize = 255;
pub const MAX_CURRENCY_LENGTH: usize = 8;
pub const MAX_AMOUNT: f64 = 1_000_000.0;
pub const JOIN_CODE_LENGTH: usize = 6;

// Audit action names.
pub const PROFILE_CREATED: &str = "PROFILE_CREATED";
pub const PROFILE_UPDATED: &str = "PROFILE_UPDATED";
pub const BUDGET_CREATED: &str = "BUDGET_CREATED";
pub const BUDGET_DELETED: &str = "BUDGET_DELETED";
pub const BUDGET_CURRENCY_UPDATED: &str = "BUDGET_CURRENCY_UPDATED";
pub const JOIN_REQUESTED: &str = "JOIN_REQUESTED";
pub const MEMBER_STATUS_UPDATED: &str = "MEMBER_STATUS_UPDATED";
pub const MEMBER_ROLE_UPDATED: &str = "MEMBER_ROLE_UPDATED";
pub const MEMBER_REMOVED: &str = "MEMBER_REMOVED";
pub const TRANSACTION_ADDED: &str = "TRANSACTION_ADDED";
pub const TRANSACTION_DELETED: &str = "TRANSACTION_DELETED";
pub const DEBTS_QUERIED: &str = "DEBTS_QUERIED";
pub const ANALYTICS_QUERIED: &str = "ANALYTICS_QUERIED";
