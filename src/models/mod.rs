pub mod audit;
pub mod budget;
pub mod profile;
pub mod transaction;

pub use audit::{AppLog, BudgetAudit};
pub use budget::{Budget, BudgetMode, Member, MemberRole, MemberStatus};
pub use profile::Profile;
pub use transaction::{Category, SplitPolicy, Transaction, TransactionKind};
