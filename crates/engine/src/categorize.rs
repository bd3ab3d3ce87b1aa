use serde::Deserialize;
use thiserror::Error;

use tabula_core::Category;

/// One ordered rule: a category and the keywords that select it.
/// Keywords are held lowercase; matching is substring, case-insensitive.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Failed to parse rules TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(rename = "rule")]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    category: String,
    keywords: Vec<String>,
}

/// Assigns a category from a transaction description.
///
/// The rule table is ordered and order is part of the contract: the first
/// category with a keyword hit wins, so broad keywords ("transfer") must
/// come after the narrower phrases they would otherwise shadow
/// ("transfer received"). Total function: no hit files under `Other`.
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                category: r.category,
                keywords: r.keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Build the rule table from a TOML document of `[[rule]]` blocks:
    ///
    /// ```toml
    /// [[rule]]
    /// category = "Food"
    /// keywords = ["restaurant", "doordash"]
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(content)?;
        let rules = file
            .rules
            .into_iter()
            .map(|raw| {
                let category = raw
                    .category
                    .parse::<Category>()
                    .map_err(|_| RuleError::UnknownCategory(raw.category.clone()))?;
                Ok(CategoryRule { category, keywords: raw.keywords })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        Ok(Self::new(rules))
    }

    pub fn categorize(&self, description: &str) -> Category {
        let lower = description.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|r| r.category)
            .unwrap_or(Category::Other)
    }
}

impl Default for Categorizer {
    /// Built-in keyword table; replaceable at startup via [`from_toml`].
    ///
    /// [`from_toml`]: Categorizer::from_toml
    fn default() -> Self {
        fn rule(category: Category, keywords: &[&str]) -> CategoryRule {
            CategoryRule {
                category,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            }
        }

        Self::new(vec![
            rule(
                Category::Income,
                &["deposit", "payroll", "transfer received", "credit", "ssa", "social security", "refund"],
            ),
            rule(
                Category::Transfers,
                &["zelle", "transfer", "venmo", "paypal", "cash app"],
            ),
            rule(
                Category::Subscriptions,
                &["rocket money", "netflix", "spotify", "amazon prime", "subscription"],
            ),
            rule(
                Category::Shopping,
                &["amazon", "walmart", "target", "purchase"],
            ),
            rule(
                Category::Bills,
                &["utilities", "electric", "water", "internet", "phone"],
            ),
            rule(
                Category::Food,
                &["restaurant", "uber eats", "doordash", "grubhub"],
            ),
        ])
    }
}
