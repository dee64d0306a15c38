//! Basic enumerations shared by the model and the pipeline

use serde::{Deserialize, Serialize};

/// Ordering applied to the filtered expense list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first
    DateDesc,
    /// Oldest first
    DateAsc,
    /// Largest amount first
    AmountDesc,
    /// Smallest amount first
    AmountAsc,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::DateDesc
    }
}

impl SortKey {
    /// Parse a sort key, returning `None` for anything unrecognized.
    ///
    /// An unrecognized key keeps the filtered order as it is.
    pub fn lenient(s: &str) -> Option<SortKey> {
        s.parse().ok()
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date-desc" => Ok(SortKey::DateDesc),
            "date-asc" => Ok(SortKey::DateAsc),
            "amount-desc" => Ok(SortKey::AmountDesc),
            "amount-asc" => Ok(SortKey::AmountAsc),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::DateDesc => write!(f, "date-desc"),
            SortKey::DateAsc => write!(f, "date-asc"),
            SortKey::AmountDesc => write!(f, "amount-desc"),
            SortKey::AmountAsc => write!(f, "amount-asc"),
        }
    }
}

/// Where a category comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryScope {
    /// Shared by every user
    Global,
    /// Created and owned by the current user
    User,
}

impl Default for CategoryScope {
    fn default() -> Self {
        CategoryScope::Global
    }
}

impl std::fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryScope::Global => write!(f, "global"),
            CategoryScope::User => write!(f, "user"),
        }
    }
}
