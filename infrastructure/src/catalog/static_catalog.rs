//! In-memory catalog loaded from the bundled entry list

use refdesk_domain::catalog::{CatalogRepository, Category, Entry, EntrySummary, SearchMatch};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

const BUILTIN_ENTRIES: &str = include_str!("entries.toml");

/// Minimum Jaro-Winkler similarity for a name to be suggested
const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog entries: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate catalog entry '{0}'")]
    Duplicate(String),
}

#[derive(Deserialize)]
struct EntryFile {
    entries: Vec<Entry>,
}

/// Read-only catalog keyed by slug
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: BTreeMap<String, Entry>,
}

impl StaticCatalog {
    /// Catalog with the entries shipped in the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_ENTRIES)
    }

    pub fn from_toml(source: &str) -> Result<Self, CatalogError> {
        let file: EntryFile = toml::from_str(source)?;
        Self::from_entries(file.entries)
    }

    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if map.contains_key(&entry.name) {
                return Err(CatalogError::Duplicate(entry.name));
            }
            map.insert(entry.name.clone(), entry);
        }
        Ok(Self { entries: map })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Relevance of `entry` for the lowercase query terms
fn score(entry: &Entry, terms: &[String]) -> u32 {
    let name = entry.name.to_lowercase();
    let title = entry.title.to_lowercase();
    let summary = entry.summary.to_lowercase();

    terms
        .iter()
        .map(|term| {
            let mut s = 0;
            if name == *term {
                s += 100;
            } else if name.contains(term.as_str()) {
                s += 50;
            }
            if title.contains(term.as_str()) {
                s += 30;
            }
            if summary.contains(term.as_str()) {
                s += 10;
            }
            s
        })
        .sum()
}

impl CatalogRepository for StaticCatalog {
    fn get(&self, name: &str) -> Option<Entry> {
        self.entries.get(name).cloned()
    }

    fn list(&self, category: Option<Category>) -> Vec<EntrySummary> {
        self.entries
            .values()
            .filter(|e| category.is_none_or(|c| e.category == c))
            .map(Entry::summary)
            .collect()
    }

    fn search(&self, query: &str, limit: usize) -> Vec<SearchMatch> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<SearchMatch> = self
            .entries
            .values()
            .filter_map(|entry| {
                let s = score(entry, &terms);
                (s > 0).then(|| SearchMatch {
                    name: entry.name.clone(),
                    title: entry.title.clone(),
                    score: s,
                })
            })
            .collect();

        // BTreeMap order makes ties alphabetical; keep it with a stable sort
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(limit);
        matches
    }

    fn suggest(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(&str, f64)> = self
            .entries
            .keys()
            .map(|candidate| (candidate.as_str(), strsim::jaro_winkler(&needle, candidate)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(limit)
            .map(|(candidate, _)| candidate.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::builtin().unwrap()
    }

    #[test]
    fn test_builtin_entries_parse() {
        let catalog = catalog();
        assert!(catalog.len() >= 10);
        // Every related slug points at a real entry
        for entry in catalog.entries.values() {
            for related in &entry.related {
                assert!(
                    catalog.get(related).is_some(),
                    "{} -> {} is dangling",
                    entry.name,
                    related
                );
            }
        }
    }

    #[test]
    fn test_get_and_list() {
        let catalog = catalog();
        let entry = catalog.get("circuit-breaker").unwrap();
        assert_eq!(entry.category, Category::Resilience);
        assert!(catalog.get("Circuit-Breaker").is_none());

        let caching = catalog.list(Some(Category::Caching));
        assert!(!caching.is_empty());
        assert!(caching.iter().all(|e| e.category == Category::Caching));
        assert_eq!(catalog.list(None).len(), catalog.len());

        let names: Vec<_> = caching.iter().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_search_ranks_name_matches_first() {
        let catalog = catalog();
        let matches = catalog.search("Cache", 10);
        assert!(!matches.is_empty());
        assert!(matches[0].name.contains("cache"));
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));

        assert_eq!(catalog.search("cache", 1).len(), 1);
        assert!(catalog.search("   ", 5).is_empty());
        assert!(catalog.search("zzzz", 5).is_empty());
    }

    #[test]
    fn test_suggest_close_names() {
        let catalog = catalog();
        let suggestions = catalog.suggest("circut-breaker", 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("circuit-breaker"));
        assert!(catalog.suggest("xylophone", 3).is_empty());
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let source = r#"
[[entries]]
name = "retry"
title = "Retry"
category = "resilience"
summary = "a"

[[entries]]
name = "retry"
title = "Retry again"
category = "resilience"
summary = "b"
"#;
        assert!(matches!(
            StaticCatalog::from_toml(source),
            Err(CatalogError::Duplicate(name)) if name == "retry"
        ));
    }
}
