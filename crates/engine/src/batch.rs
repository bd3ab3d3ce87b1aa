use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use tabula_core::Transaction;
use tabula_parse::{detect, parse_statement};

use crate::categorize::Categorizer;
use crate::dedup::{filter_new, ExistingRecord};

/// Minimum amount of recovered text worth parsing; anything shorter is a
/// failed extraction, not an empty statement.
const MIN_TEXT_LEN: usize = 100;

/// One OCR-recovered document, ready for parsing.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub id: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Populate each transaction's category from its description.
    pub auto_category: bool,
    /// Drop transactions identity-matching the existing snapshot.
    pub duplicate_check: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { auto_category: true, duplicate_check: true }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Insufficient text extracted ({0} chars)")]
    InsufficientText(usize),
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchWarning {
    pub source: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResult {
    /// Documents that made it through parsing, whether or not they yielded
    /// transactions.
    pub processed_count: usize,
    pub error_count: usize,
    pub transactions: Vec<Transaction>,
    pub errors: Vec<BatchError>,
    pub warnings: Vec<BatchWarning>,
}

impl BatchResult {
    pub fn summary(&self) -> String {
        format!(
            "Processed {} documents with {} transactions. Errors: {}",
            self.processed_count,
            self.transactions.len(),
            self.error_count
        )
    }
}

/// Drives detection, parsing, categorization, and deduplication over a
/// collection of documents.
///
/// Per-document isolation is the defining property: nothing that goes wrong
/// inside one document may abort the batch. The existing-transaction
/// snapshot is taken once by the caller; deduplication runs as a single
/// pass over the aggregated candidates after the document loop.
pub struct Engine {
    categorizer: Categorizer,
    today: NaiveDate,
}

impl Engine {
    pub fn new(categorizer: Categorizer) -> Self {
        Self { categorizer, today: Local::now().date_naive() }
    }

    /// Pin the reference date used for year inference; parsing is otherwise
    /// tied to the wall clock.
    pub fn with_today(categorizer: Categorizer, today: NaiveDate) -> Self {
        Self { categorizer, today }
    }

    pub fn process(
        &self,
        documents: &[SourceDocument],
        existing: &[ExistingRecord],
        options: &BatchOptions,
    ) -> BatchResult {
        let mut result = BatchResult {
            processed_count: 0,
            error_count: 0,
            transactions: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        for doc in documents {
            tracing::info!(source = %doc.id, "processing document");
            match self.process_document(doc) {
                Ok(mut transactions) => {
                    if transactions.is_empty() {
                        tracing::warn!(source = %doc.id, "no transactions found");
                        result.warnings.push(BatchWarning {
                            source: doc.id.clone(),
                            message: "No transactions found".to_string(),
                        });
                    } else {
                        if options.auto_category {
                            for t in &mut transactions {
                                t.category = Some(self.categorizer.categorize(&t.description));
                            }
                        }
                        tracing::info!(
                            source = %doc.id,
                            count = transactions.len(),
                            "extracted transactions"
                        );
                        result.transactions.append(&mut transactions);
                    }
                    result.processed_count += 1;
                }
                Err(e) => {
                    tracing::error!(source = %doc.id, error = %e, "document failed");
                    result.error_count += 1;
                    result.errors.push(BatchError {
                        source: doc.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if options.duplicate_check {
            let before = result.transactions.len();
            result.transactions = filter_new(std::mem::take(&mut result.transactions), existing);
            let dropped = before - result.transactions.len();
            if dropped > 0 {
                tracing::info!(dropped, "duplicate transactions filtered");
            }
        }

        tracing::info!(
            processed = result.processed_count,
            transactions = result.transactions.len(),
            errors = result.error_count,
            "batch complete"
        );
        result
    }

    fn process_document(&self, doc: &SourceDocument) -> Result<Vec<Transaction>, ProcessError> {
        let len = doc.text.trim().len();
        if len < MIN_TEXT_LEN {
            return Err(ProcessError::InsufficientText(len));
        }
        let tag = detect(&doc.text);
        tracing::debug!(source = %doc.id, format = %tag, "format detected");
        Ok(parse_statement(tag, &doc.text, &doc.id, self.today))
    }
}
