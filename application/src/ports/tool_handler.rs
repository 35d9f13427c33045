//! Tool Handler port
//!
//! Defines the interface every tool registered with the dispatcher
//! implements. The dispatcher is agnostic to what a handler does
//! internally (static lookup or external call).

use async_trait::async_trait;
use refdesk_domain::tool::{FieldViolation, ToolDefinition, ToolInvocation, ToolPayload};
use thiserror::Error;

/// Expected failures a handler can report.
///
/// These are ordinary outcomes, not incidents: the dispatcher converts each
/// into a `ToolResult::Failure` of the matching kind. Anything truly
/// unexpected should be `Internal` (or a panic), which the dispatcher
/// logs in full and downgrades to a generic message.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The requested entity does not exist
    #[error("{message}")]
    NotFound {
        message: String,
        suggestions: Vec<String>,
    },

    /// Input passed schema validation but was rejected by the handler
    #[error("Invalid parameters: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// The dependency's circuit breaker rejected the call without attempting it
    #[error("Circuit open for dependency '{0}'")]
    CircuitOpen(String),

    /// The external call was attempted and failed
    #[error("Dependency '{dependency}' failed: {message}")]
    Dependency { dependency: String, message: String },

    /// Unexpected failure inside the handler
    #[error("Internal handler error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn not_found(message: impl Into<String>, suggestions: Vec<String>) -> Self {
        HandlerError::NotFound {
            message: message.into(),
            suggestions,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        HandlerError::Internal(message.into())
    }
}

/// Port for a single named tool
///
/// Handlers receive parameters that are already sanitized and validated
/// against [`definition()`](Self::definition).
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Schema, cache policy and dependency of this tool
    fn definition(&self) -> &ToolDefinition;

    /// Handle one invocation
    async fn handle(&self, invocation: &ToolInvocation) -> Result<ToolPayload, HandlerError>;
}
