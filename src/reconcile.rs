//! Debt reconciliation for sharing-mode budgets.
//!
//! Pure computation: given a budget's members and transactions, derive each
//! accepted member's net balance and a minimal list of transfers that settles
//! all balances. No I/O, no stored state; callers recompute on demand.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::SETTLE_EPSILON;
use crate::error::{BudgetError, FieldError};
use crate::models::{Member, SplitPolicy, Transaction, TransactionKind};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DebtReport {
    /// Net balance per accepted member. Positive means the member is owed
    /// money, negative means the member owes.
    pub balances: BTreeMap<String, f64>,
    pub transfers: Vec<Transfer>,
    pub total_spending: f64,
}

/// Computes net balances and settling transfers for a budget.
///
/// Only accepted members participate. An expense qualifies when its payer is
/// an accepted member; common expenses (`payer_id == None`) and expenses paid
/// by departed users contribute neither to balances nor to `total_spending`.
/// Income transactions are ignored entirely.
pub fn reconcile(members: &[Member], transactions: &[Transaction]) -> Result<DebtReport, BudgetError> {
    let accepted: BTreeSet<&str> = members
        .iter()
        .filter(|m| m.is_accepted())
        .map(|m| m.user_id.as_str())
        .collect();
    debug!("reconciling {} transactions over {} accepted members", transactions.len(), accepted.len());

    let mut balances: BTreeMap<String, f64> =
        accepted.iter().map(|id| ((*id).to_string(), 0.0)).collect();
    let mut total_spending = 0.0;

    for tx in transactions.iter().filter(|t| t.kind == TransactionKind::Expense) {
        if !tx.amount.is_finite() || tx.amount <= 0.0 {
            return Err(BudgetError::InvalidInput(
                "amount".to_string(),
                FieldError {
                    field: "amount".to_string(),
                    title: "Invalid Amount".to_string(),
                    description: format!("Expense {} has a non-positive or non-finite amount", tx.id),
                },
            ));
        }

        let payer = match tx.payer_id.as_deref() {
            Some(p) if accepted.contains(p) => p,
            _ => continue,
        };

        let split_set = split_set(tx, &accepted);
        let share = tx.amount / split_set.len() as f64;

        *balances.entry(payer.to_string()).or_insert(0.0) += tx.amount;
        for user in &split_set {
            *balances.entry((*user).to_string()).or_insert(0.0) -= share;
        }
        total_spending += tx.amount;
    }

    let transfers = settle_transfers(&balances);
    Ok(DebtReport {
        balances,
        transfers,
        total_spending,
    })
}

/// Resolves the set of users an expense is divided among.
///
/// Participants who are not accepted members are dropped; if nothing is left
/// (or the policy is `AllMembers`), the expense splits across all accepted
/// members.
fn split_set<'a>(tx: &'a Transaction, accepted: &BTreeSet<&'a str>) -> BTreeSet<&'a str> {
    match &tx.split {
        SplitPolicy::AllMembers => accepted.clone(),
        SplitPolicy::Among(ids) => {
            let mut present = BTreeSet::new();
            for id in ids {
                if accepted.contains(id.as_str()) {
                    present.insert(id.as_str());
                } else {
                    warn!("expense {} names participant {} who is not an accepted member, skipping", tx.id, id);
                }
            }
            if present.is_empty() { accepted.clone() } else { present }
        }
    }
}

/// Greedy settlement: repeatedly matches the largest debtor against the
/// largest creditor. Emits at most `|debtors| + |creditors| - 1` transfers.
pub fn settle_transfers(balances: &BTreeMap<String, f64>) -> Vec<Transfer> {
    let mut creditors: Vec<(&str, f64)> = balances
        .iter()
        .filter(|&(_, &b)| b > SETTLE_EPSILON)
        .map(|(id, &b)| (id.as_str(), b))
        .collect();
    let mut debtors: Vec<(&str, f64)> = balances
        .iter()
        .filter(|&(_, &b)| b < -SETTLE_EPSILON)
        .map(|(id, &b)| (id.as_str(), -b))
        .collect();

    // Descending magnitude, user id as tie-break, so repeated calls produce
    // the same transfer list.
    creditors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    debtors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut transfers = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let settled = debtors[i].1.min(creditors[j].1);

        if settled > SETTLE_EPSILON {
            transfers.push(Transfer {
                from: debtors[i].0.to_string(),
                to: creditors[j].0.to_string(),
                amount: settled,
            });
        }

        debtors[i].1 -= settled;
        creditors[j].1 -= settled;

        if debtors[i].1 < SETTLE_EPSILON {
            i += 1;
        }
        if creditors[j].1 < SETTLE_EPSILON {
            j += 1;
        }
    }

    debug!("settled {} balances into {} transfers", balances.len(), transfers.len());
    transfers
}
