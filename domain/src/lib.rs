//! Domain layer for refdesk
//!
//! This crate contains the core types of the request-resilience layer:
//! tool definitions and invocations, tagged results, input sanitization,
//! parameter validation, cache keys and circuit breaker value objects.
//! It has no dependencies on infrastructure or presentation concerns.

pub mod catalog;
pub mod config;
pub mod resilience;
pub mod tool;

// Re-export commonly used types
pub use catalog::{CatalogRepository, Category, Entry, EntrySummary, RemoteDocument, SearchMatch};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use resilience::{BreakerPolicy, BreakerSnapshot, BreakerState};
pub use tool::{
    CachePolicy, DefaultToolValidator, ErrorKind, FieldPattern, FieldViolation, ParamConstraint,
    ParamType, ToolDefinition, ToolFailure, ToolInvocation, ToolParameter, ToolPayload,
    ToolResult, ToolValidator, cache_key, sanitize, sanitize_params,
};
