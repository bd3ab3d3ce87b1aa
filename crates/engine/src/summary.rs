use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use tabula_core::{Category, Money, Transaction};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub count: usize,
    /// Net total for the category (signed).
    pub total: Money,
    /// Share of the batch's absolute volume, 0–100.
    pub share_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTotals {
    /// `YYYY-MM`.
    pub month: String,
    pub income: Money,
    /// Magnitude of outflows (positive).
    pub expenses: Money,
    pub net: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
    /// Categories in table order; empty ones are omitted. Uncategorized
    /// transactions count under `Other`.
    pub by_category: Vec<CategoryBreakdown>,
    /// Months in ascending order.
    pub by_month: Vec<MonthlyTotals>,
}

/// Pure rollup over a transaction slice: overall totals, per-category
/// breakdown, per-month income/expenses/net. Rendering is the caller's
/// business.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = Money::zero();
    let mut expenses = Money::zero();
    let mut total_abs_cents: i64 = 0;

    let mut categories: BTreeMap<usize, (usize, Money)> = BTreeMap::new();
    let mut months: BTreeMap<String, (Money, Money)> = BTreeMap::new();

    for t in transactions {
        if t.amount.is_negative() {
            expenses = expenses + t.amount.abs();
        } else {
            income = income + t.amount;
        }
        total_abs_cents += t.amount.to_cents().abs();

        let category = t.category.unwrap_or(Category::Other);
        let slot = category_slot(category);
        let entry = categories.entry(slot).or_insert((0, Money::zero()));
        entry.0 += 1;
        entry.1 = entry.1 + t.amount;

        let month = format!("{}-{:02}", t.date.year(), t.date.month());
        let entry = months.entry(month).or_insert((Money::zero(), Money::zero()));
        if t.amount.is_negative() {
            entry.1 = entry.1 + t.amount.abs();
        } else {
            entry.0 = entry.0 + t.amount;
        }
    }

    let by_category = categories
        .into_iter()
        .map(|(slot, (count, total))| CategoryBreakdown {
            category: Category::ALL[slot],
            count,
            total,
            share_pct: if total_abs_cents > 0 {
                (total.to_cents().abs() as f64 / total_abs_cents as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    let by_month = months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyTotals {
            month,
            income,
            expenses,
            net: income - expenses,
        })
        .collect();

    Summary {
        income,
        expenses,
        net: income - expenses,
        by_category,
        by_month,
    }
}

fn category_slot(category: Category) -> usize {
    Category::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(Category::ALL.len() - 1)
}
