//! Tool handlers served by the dispatcher
//!
//! - [`catalog`]: lookups against the static catalog (always available)
//! - [`remote`]: `fetch_remote_doc`, which reaches the remote docs API
//!   through its circuit breaker

pub mod catalog;
pub mod remote;

pub use catalog::{GetEntryHandler, GetExamplesHandler, ListEntriesHandler, SearchEntriesHandler};
pub use remote::FetchRemoteDocHandler;

use refdesk_application::ports::tool_handler::ToolHandler;
use refdesk_domain::catalog::CatalogRepository;
use refdesk_domain::tool::{FieldPattern, ToolParameter};
use std::sync::Arc;

/// Lowercase slug: letters, digits and dashes, not starting with a dash
pub const SLUG_PATTERN: &str = "^[a-z0-9][a-z0-9-]*$";

/// Maximum number of names suggested for a missing entry
pub(crate) const MAX_SUGGESTIONS: usize = 3;

/// Required `name` parameter shared by the entry tools
pub(crate) fn name_parameter() -> ToolParameter {
    let pattern = FieldPattern::new(SLUG_PATTERN).expect("slug pattern is a valid regex");
    ToolParameter::new("name", "Entry slug, e.g. 'circuit-breaker'", true)
        .with_length(1, 64)
        .with_pattern(pattern)
}

/// Handlers for every catalog tool
pub fn catalog_handlers(catalog: Arc<dyn CatalogRepository>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(GetEntryHandler::new(Arc::clone(&catalog))),
        Arc::new(ListEntriesHandler::new(Arc::clone(&catalog))),
        Arc::new(SearchEntriesHandler::new(Arc::clone(&catalog))),
        Arc::new(GetExamplesHandler::new(catalog)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    #[test]
    fn test_catalog_handlers_have_unique_names() {
        let handlers = catalog_handlers(Arc::new(StaticCatalog::builtin().unwrap()));
        let mut names: Vec<_> = handlers
            .iter()
            .map(|h| h.definition().name.clone())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(
            names,
            vec!["get_entry", "get_examples", "list_entries", "search_entries"]
        );
    }

    #[test]
    fn test_name_parameter_pattern() {
        let pattern = FieldPattern::new(SLUG_PATTERN).unwrap();
        assert!(pattern.is_match("circuit-breaker"));
        assert!(pattern.is_match("3-phase-commit"));
        assert!(!pattern.is_match("-leading"));
        assert!(!pattern.is_match("Upper"));
        assert!(!pattern.is_match("has space"));
        assert!(name_parameter().required);
    }
}
