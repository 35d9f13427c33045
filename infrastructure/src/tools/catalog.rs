//! Catalog lookup tools: get_entry, list_entries, search_entries, get_examples

use async_trait::async_trait;
use refdesk_application::ports::tool_handler::{HandlerError, ToolHandler};
use refdesk_domain::catalog::{CatalogRepository, Category};
use refdesk_domain::tool::{
    CachePolicy, FieldViolation, ToolDefinition, ToolInvocation, ToolParameter, ToolPayload,
};
use std::sync::Arc;
use std::time::Duration;

use super::{MAX_SUGGESTIONS, name_parameter};

pub const GET_ENTRY: &str = "get_entry";
pub const LIST_ENTRIES: &str = "list_entries";
pub const SEARCH_ENTRIES: &str = "search_entries";
pub const GET_EXAMPLES: &str = "get_examples";

/// Results returned by search_entries when `limit` is not given
const DEFAULT_SEARCH_LIMIT: usize = 10;
const MAX_SEARCH_LIMIT: i64 = 50;

pub fn get_entry_definition() -> ToolDefinition {
    ToolDefinition::new(GET_ENTRY, "Look up a reference entry by its slug.")
        .with_parameter(name_parameter())
        .with_cache_policy(CachePolicy::success_for(Duration::from_secs(30 * 60)))
}

pub fn list_entries_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_ENTRIES,
        "List reference entries, optionally restricted to one category.",
    )
    .with_parameter(
        ToolParameter::new("category", "Category to list", false)
            .with_one_of(Category::names()),
    )
    .with_cache_policy(CachePolicy::success_for(Duration::from_secs(10 * 60)))
}

pub fn search_entries_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_ENTRIES,
        "Search entry names, titles and summaries for the given words.",
    )
    .with_parameter(ToolParameter::new("query", "Words to search for", true).with_length(1, 100))
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of matches (default: 10)", false)
            .with_range(1, MAX_SEARCH_LIMIT),
    )
    .with_cache_policy(CachePolicy::success_for(Duration::from_secs(10 * 60)))
}

pub fn get_examples_definition() -> ToolDefinition {
    ToolDefinition::new(GET_EXAMPLES, "Get usage examples for a reference entry.")
        .with_parameter(name_parameter())
        .with_cache_policy(CachePolicy::success_for(Duration::from_secs(30 * 60)))
}

fn not_found(catalog: &dyn CatalogRepository, name: &str) -> HandlerError {
    HandlerError::not_found(
        format!("No entry named '{}'", name),
        catalog.suggest(name, MAX_SUGGESTIONS),
    )
}

/// Handler for `get_entry`
pub struct GetEntryHandler {
    definition: ToolDefinition,
    catalog: Arc<dyn CatalogRepository>,
}

impl GetEntryHandler {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            definition: get_entry_definition(),
            catalog,
        }
    }
}

#[async_trait]
impl ToolHandler for GetEntryHandler {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn handle(&self, invocation: &ToolInvocation) -> Result<ToolPayload, HandlerError> {
        let name = invocation
            .require_string("name")
            .map_err(HandlerError::internal)?;
        self.catalog
            .get(name)
            .map(ToolPayload::Entry)
            .ok_or_else(|| not_found(self.catalog.as_ref(), name))
    }
}

/// Handler for `list_entries`
pub struct ListEntriesHandler {
    definition: ToolDefinition,
    catalog: Arc<dyn CatalogRepository>,
}

impl ListEntriesHandler {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            definition: list_entries_definition(),
            catalog,
        }
    }
}

#[async_trait]
impl ToolHandler for ListEntriesHandler {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn handle(&self, invocation: &ToolInvocation) -> Result<ToolPayload, HandlerError> {
        let category = invocation
            .get_string("category")
            .map(|raw| {
                raw.parse::<Category>().map_err(|e| {
                    HandlerError::Validation(vec![FieldViolation::new(
                        "category",
                        "one_of",
                        e.to_string(),
                    )])
                })
            })
            .transpose()?;

        Ok(ToolPayload::EntryList {
            category,
            entries: self.catalog.list(category),
        })
    }
}

/// Handler for `search_entries`
pub struct SearchEntriesHandler {
    definition: ToolDefinition,
    catalog: Arc<dyn CatalogRepository>,
}

impl SearchEntriesHandler {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            definition: search_entries_definition(),
            catalog,
        }
    }
}

#[async_trait]
impl ToolHandler for SearchEntriesHandler {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn handle(&self, invocation: &ToolInvocation) -> Result<ToolPayload, HandlerError> {
        let query = invocation
            .require_string("query")
            .map_err(HandlerError::internal)?;
        let limit = invocation
            .get_i64("limit")
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(DEFAULT_SEARCH_LIMIT);

        Ok(ToolPayload::SearchResults {
            query: query.to_string(),
            matches: self.catalog.search(query, limit),
        })
    }
}

/// Handler for `get_examples`
pub struct GetExamplesHandler {
    definition: ToolDefinition,
    catalog: Arc<dyn CatalogRepository>,
}

impl GetExamplesHandler {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            definition: get_examples_definition(),
            catalog,
        }
    }
}

#[async_trait]
impl ToolHandler for GetExamplesHandler {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn handle(&self, invocation: &ToolInvocation) -> Result<ToolPayload, HandlerError> {
        let name = invocation
            .require_string("name")
            .map_err(HandlerError::internal)?;
        let entry = self
            .catalog
            .get(name)
            .ok_or_else(|| not_found(self.catalog.as_ref(), name))?;

        Ok(ToolPayload::Examples {
            name: entry.name,
            examples: entry.examples,
        })
    }
}
