pub mod batch;
pub mod categorize;
pub mod dedup;
pub mod summary;

pub use batch::{
    BatchError, BatchOptions, BatchResult, BatchWarning, Engine, ProcessError, SourceDocument,
};
pub use categorize::{Categorizer, CategoryRule, RuleError};
pub use dedup::{filter_new, ExistingRecord};
pub use summary::{summarize, CategoryBreakdown, MonthlyTotals, Summary};
