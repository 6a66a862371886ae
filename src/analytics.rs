//! Aggregations backing the analytics views: per-category totals, daily
//! balance trend, and per-payer contributions. All functions are pure and
//! operate on transaction slices supplied by the caller.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Transaction, TransactionKind};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    Month,
    Year,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub kind: TransactionKind,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub balance: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MemberContribution {
    /// `None` is the common bucket: transactions recorded without a payer.
    pub payer_id: Option<String>,
    pub income: f64,
    pub expense: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSummary {
    pub range: TimeRange,
    pub categories: Vec<CategoryTotal>,
    pub trend: Vec<TrendPoint>,
    pub contributions: Vec<MemberContribution>,
}

/// Keeps the transactions whose date falls in the calendar window (ISO week,
/// month, or year) containing `now`.
pub fn filter_by_range(transactions: &[Transaction], range: TimeRange, now: DateTime<Utc>) -> Vec<Transaction> {
    let (start, end) = range_bounds(range, now);
    debug!("filtering {} transactions to {}..={}", transactions.len(), start, end);
    transactions
        .iter()
        .filter(|tx| {
            let d = tx.date.date_naive();
            d >= start && d <= end
        })
        .cloned()
        .collect()
}

fn range_bounds(range: TimeRange, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let today = now.date_naive();
    match range {
        TimeRange::Week => {
            let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            (start, start + Duration::days(6))
        }
        TimeRange::Month => {
            let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
            let end = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
            }
            .map(|d| d - Duration::days(1))
            .unwrap_or(today);
            (start, end)
        }
        TimeRange::Year => {
            let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            let end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
            (start, end)
        }
    }
}

/// Totals per category, largest first.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(tx.category).or_insert(0.0) += tx.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category,
            kind: category.kind(),
            total,
        })
        .collect();
    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    breakdown
}

/// Running income-minus-expense balance, one point per day (the last balance
/// of each day wins).
pub fn balance_trend(transactions: &[Transaction]) -> Vec<TrendPoint> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut balance = 0.0;
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in ordered {
        match tx.kind {
            TransactionKind::Income => balance += tx.amount,
            TransactionKind::Expense => balance -= tx.amount,
        }
        daily.insert(tx.date.date_naive(), balance);
    }

    daily
        .into_iter()
        .map(|(date, balance)| TrendPoint { date, balance })
        .collect()
}

/// Income/expense totals per payer. Transactions without a payer land in the
/// common bucket; payers who have since left the budget keep their history.
/// Entries with no activity are dropped.
pub fn member_contributions(transactions: &[Transaction]) -> Vec<MemberContribution> {
    let mut totals: BTreeMap<Option<String>, (f64, f64)> = BTreeMap::new();
    for tx in transactions {
        let entry = totals.entry(tx.payer_id.clone()).or_insert((0.0, 0.0));
        match tx.kind {
            TransactionKind::Income => entry.0 += tx.amount,
            TransactionKind::Expense => entry.1 += tx.amount,
        }
    }

    totals
        .into_iter()
        .filter(|(_, (income, expense))| *income > 0.0 || *expense > 0.0)
        .map(|(payer_id, (income, expense))| MemberContribution {
            payer_id,
            income,
            expense,
        })
        .collect()
}
