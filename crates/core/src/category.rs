use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of labels a transaction can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Income,
    Transfers,
    Subscriptions,
    Shopping,
    Bills,
    Food,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Income,
        Category::Transfers,
        Category::Subscriptions,
        Category::Shopping,
        Category::Bills,
        Category::Food,
        Category::Other,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Income => write!(f, "Income"),
            Category::Transfers => write!(f, "Transfers"),
            Category::Subscriptions => write!(f, "Subscriptions"),
            Category::Shopping => write!(f, "Shopping"),
            Category::Bills => write!(f, "Bills"),
            Category::Food => write!(f, "Food"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Category::Income),
            "transfers" => Ok(Category::Transfers),
            "subscriptions" => Ok(Category::Subscriptions),
            "shopping" => Ok(Category::Shopping),
            "bills" => Ok(Category::Bills),
            "food" => Ok(Category::Food),
            "other" => Ok(Category::Other),
            other => Err(format!("Unknown category: '{other}'")),
        }
    }
}
