use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tabula_core::{Money, Transaction};

/// The slice of a stored transaction that participates in duplicate
/// detection. Ids, balances, and source files are excluded from identity
/// on purpose: re-parsing the same statement must not create new records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
}

impl From<&Transaction> for ExistingRecord {
    fn from(t: &Transaction) -> Self {
        ExistingRecord {
            date: t.date,
            description: t.description.clone(),
            amount: t.amount,
        }
    }
}

fn key(date: NaiveDate, description: &str, amount: Money) -> (NaiveDate, String, Money) {
    (date, description.to_string(), amount)
}

/// Keep candidates whose (date, description, amount) triple does not appear
/// in the existing snapshot.
///
/// Stable: survivors keep their input order. The snapshot is indexed once,
/// so the pass is linear in candidates + existing rather than quadratic.
pub fn filter_new(candidates: Vec<Transaction>, existing: &[ExistingRecord]) -> Vec<Transaction> {
    let seen: HashSet<_> = existing
        .iter()
        .map(|e| key(e.date, &e.description, e.amount))
        .collect();
    candidates
        .into_iter()
        .filter(|t| !seen.contains(&key(t.date, &t.description, t.amount)))
        .collect()
}
