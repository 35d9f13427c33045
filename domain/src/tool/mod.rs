//! Tool domain module
//!
//! Defines what a tool invocation is and what it can produce, plus the
//! pure steps the dispatcher applies before a handler ever runs.
//!
//! ```text
//! raw params ──▶ sanitize ──▶ validate ──▶ cache_key ──▶ handler ──▶ ToolResult
//!               (trim all     (per-field   (sorted,                  Success(ToolPayload)
//!                strings)      schema)      canonical)               Failure(ToolFailure)
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: name, parameters with constraints, cache policy,
//!   and the external dependency the tool calls (if any)
//! - [`ToolInvocation`]: tool name plus parameters of one request
//! - [`ToolResult`]: tagged outcome; failures carry an [`ErrorKind`]
//! - [`ToolPayload`]: one variant per tool category
//! - [`ToolValidator`]: pure parameter validation
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolHandler`, `ToolDispatcher`): handler port and
//!   the cache/breaker pipeline
//! - **Infrastructure**: concrete catalog and remote-doc handlers

pub mod cache_key;
pub mod entities;
pub mod payload;
pub mod sanitize;
pub mod traits;
pub mod value_objects;

pub use cache_key::cache_key;
pub use entities::{
    CachePolicy, FieldPattern, ParamConstraint, ParamType, ToolDefinition, ToolInvocation,
    ToolParameter,
};
pub use payload::ToolPayload;
pub use sanitize::{sanitize, sanitize_params};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ErrorKind, FieldViolation, ToolFailure, ToolResult};
