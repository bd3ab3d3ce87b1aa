use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::category::Category;
use crate::money::Money;

/// Whether a transaction moves money in or out. A pure function of the
/// amount's sign: zero counts as income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    pub fn from_amount(amount: Money) -> Self {
        if amount.is_negative() {
            TxnKind::Expense
        } else {
            TxnKind::Income
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxnKind::Income => write!(f, "Income"),
            TxnKind::Expense => write!(f, "Expense"),
        }
    }
}

/// One normalized financial transaction recovered from statement text.
///
/// Produced by a format parser, annotated once by the categorizer, and
/// otherwise immutable. Two transactions describe the same real-world event
/// iff their (date, description, amount) triples are equal; `id`, `balance`,
/// and `source_file` are deliberately excluded from that identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<Category>,
    pub amount: Money,
    pub kind: TxnKind,
    /// Running balance after this transaction, when the source format
    /// reports one.
    pub balance: Option<Money>,
    /// Canonical bank name, or "Unknown".
    pub bank: String,
    /// Trailing account-number fragment when recoverable.
    pub account: String,
    pub statement_period: String,
    /// Time of parsing, not of the transaction.
    pub processed_date: DateTime<Utc>,
    pub source_file: String,
}

impl Transaction {
    /// Sole constructor; keeps `kind` consistent with the amount's sign.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        source_file: impl Into<String>,
    ) -> Self {
        let description: String = description.into();
        Transaction {
            id: Uuid::new_v4(),
            date,
            description: description.trim().to_string(),
            category: None,
            amount,
            kind: TxnKind::from_amount(amount),
            balance: None,
            bank: "Unknown".to_string(),
            account: String::new(),
            statement_period: String::new(),
            processed_date: Utc::now(),
            source_file: source_file.into(),
        }
    }

    /// The duplicate-detection key.
    pub fn identity(&self) -> (NaiveDate, &str, Money) {
        (self.date, self.description.as_str(), self.amount)
    }
}
