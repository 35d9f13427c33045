//! Catalog entities

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Category an entry is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Resilience,
    Caching,
    Concurrency,
    Messaging,
    Storage,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Resilience,
        Category::Caching,
        Category::Concurrency,
        Category::Messaging,
        Category::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Resilience => "resilience",
            Category::Caching => "caching",
            Category::Concurrency => "concurrency",
            Category::Messaging => "messaging",
            Category::Storage => "storage",
        }
    }

    /// All category names, for enumerated parameter constraints
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown category name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A reference entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Slug, e.g. "circuit-breaker"
    pub name: String,
    pub title: String,
    pub category: Category,
    pub summary: String,
    #[serde(default)]
    pub examples: Vec<String>,
    /// Slugs of related entries
    #[serde(default)]
    pub related: Vec<String>,
}

impl Entry {
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            name: self.name.clone(),
            title: self.title.clone(),
            category: self.category,
        }
    }
}

/// Listing view of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub name: String,
    pub title: String,
    pub category: Category,
}

/// A search hit with its relevance score (higher is better)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub name: String,
    pub title: String,
    pub score: u32,
}

/// Document returned by the remote docs API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// URL the document was fetched from
    #[serde(default)]
    pub source_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!("CACHING".parse::<Category>().unwrap(), Category::Caching);
        assert_eq!(
            "gardening".parse::<Category>(),
            Err(UnknownCategory("gardening".to_string()))
        );
    }

    #[test]
    fn test_entry_summary() {
        let entry = Entry {
            name: "bulkhead".to_string(),
            title: "Bulkhead".to_string(),
            category: Category::Resilience,
            summary: "Isolate resource pools".to_string(),
            examples: Vec::new(),
            related: Vec::new(),
        };
        let summary = entry.summary();
        assert_eq!(summary.name, "bulkhead");
        assert_eq!(summary.category, Category::Resilience);
    }
}
