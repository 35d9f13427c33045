//! Catalog repository trait
//!
//! The reference content is opaque to the rest of the system: handlers
//! only see it through [`CatalogRepository`].

use super::entities::{Category, Entry, EntrySummary, SearchMatch};

/// Read-only access to reference entries
pub trait CatalogRepository: Send + Sync {
    /// Look up an entry by exact slug
    fn get(&self, name: &str) -> Option<Entry>;

    /// List entries, optionally restricted to one category
    fn list(&self, category: Option<Category>) -> Vec<EntrySummary>;

    /// Free-text search over names, titles and summaries
    fn search(&self, query: &str, limit: usize) -> Vec<SearchMatch>;

    /// Closest known slugs to `name`, best first
    fn suggest(&self, name: &str, limit: usize) -> Vec<String>;
}
