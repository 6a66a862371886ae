use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Closed category set. Each category belongs to exactly one transaction kind.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    // Income
    Salary,
    Gifts,
    Freelance,
    Investments,
    #[serde(rename = "Other Income")]
    OtherIncome,
    // Expense
    Food,
    Transport,
    Housing,
    Entertainment,
    Shopping,
    Health,
    Other,
}

impl Category {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Category::Salary
            | Category::Gifts
            | Category::Freelance
            | Category::Investments
            | Category::OtherIncome => TransactionKind::Income,
            Category::Food
            | Category::Transport
            | Category::Housing
            | Category::Entertainment
            | Category::Shopping
            | Category::Health
            | Category::Other => TransactionKind::Expense,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Salary => "Salary",
            Category::Gifts => "Gifts",
            Category::Freelance => "Freelance",
            Category::Investments => "Investments",
            Category::OtherIncome => "Other Income",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

/// How an expense is divided among budget members.
///
/// Constructed through [`SplitPolicy::from_participants`] so that a missing
/// and an explicitly empty participant list are the same case: both mean the
/// expense is split equally among all accepted members.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "policy", content = "participants", rename_all = "snake_case")]
pub enum SplitPolicy {
    AllMembers,
    Among(BTreeSet<String>),
}

impl SplitPolicy {
    pub fn from_participants<I>(participant_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let ids: BTreeSet<String> = participant_ids.into_iter().collect();
        if ids.is_empty() {
            SplitPolicy::AllMembers
        } else {
            SplitPolicy::Among(ids)
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: String,
    pub budget_id: String,
    pub author_id: String,
    /// `None` marks common spending with no single payer; such expenses are
    /// excluded from debt reconciliation.
    pub payer_id: Option<String>,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: Category,
    pub split: SplitPolicy,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
