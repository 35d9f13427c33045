//! Invoke Tool use case.
//!
//! [`ToolDispatcher`] is the single entry point the transport calls. It owns
//! the handler registry and runs every request through the same pipeline:
//!
//! ```text
//! invoke(name, raw_params)
//!   ├─ unknown name         → Failure(UNKNOWN_TOOL)
//!   ├─ sanitize + validate  → Failure(VALIDATION_ERROR)   (not cached)
//!   ├─ cache hit            → cached ToolResult
//!   └─ handler              → normalize → cache (per policy) → ToolResult
//! ```
//!
//! Every path ends in a [`ToolResult`]. Handler errors become failures of
//! the matching kind; panics are caught here and downgraded to a generic
//! `INTERNAL_ERROR` after being logged in full.

use futures::FutureExt;
use refdesk_domain::tool::{
    DefaultToolValidator, FieldViolation, ToolDefinition, ToolFailure, ToolInvocation,
    ToolResult, ToolValidator, cache_key, sanitize_params,
};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::ports::invocation_logger::{InvocationLogger, InvocationRecord, NoInvocationLogger};
use crate::ports::tool_handler::{HandlerError, ToolHandler};
use crate::resilience::TtlCache;

/// Errors raised while assembling a dispatcher.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatcherError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// Routes tool invocations to handlers through the cache.
pub struct ToolDispatcher {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    cache: Arc<TtlCache<ToolResult>>,
    validator: DefaultToolValidator,
    logger: Arc<dyn InvocationLogger>,
}

impl ToolDispatcher {
    pub fn new(cache: Arc<TtlCache<ToolResult>>) -> Self {
        Self {
            handlers: HashMap::new(),
            cache,
            validator: DefaultToolValidator,
            logger: Arc::new(NoInvocationLogger),
        }
    }

    /// Create with an invocation logger.
    pub fn with_logger(mut self, logger: Arc<dyn InvocationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Register a handler under its definition's name (builder pattern).
    pub fn register(mut self, handler: Arc<dyn ToolHandler>) -> Result<Self, DispatcherError> {
        self.add_handler(handler)?;
        Ok(self)
    }

    /// Register a handler under its definition's name.
    pub fn add_handler(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), DispatcherError> {
        let name = handler.definition().name.clone();
        if self.handlers.contains_key(&name) {
            return Err(DispatcherError::DuplicateTool(name));
        }
        debug!(tool = %name, "Registered tool handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Names of all registered tools, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Definitions of all registered tools, sorted by name
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        let mut defs: Vec<&ToolDefinition> =
            self.handlers.values().map(|h| h.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn cache(&self) -> &Arc<TtlCache<ToolResult>> {
        &self.cache
    }

    /// Invoke with params taken from a JSON value.
    ///
    /// `null` means no parameters; for a known tool, anything other than
    /// an object is a validation failure on the `params` field.
    pub async fn invoke_json(&self, name: &str, params: Value) -> ToolResult {
        match params {
            Value::Null => self.invoke(name, HashMap::new()).await,
            Value::Object(map) => self.invoke(name, map.into_iter().collect()).await,
            _ if !self.has_tool(name) => self.invoke(name, HashMap::new()).await,
            _ => {
                let result = ToolResult::failure(ToolFailure::validation(&[FieldViolation::new(
                    "params",
                    "type",
                    "Expected an object of named parameters",
                )]));
                self.log(name, &result, false, Duration::ZERO);
                result
            }
        }
    }

    /// Invoke a prepared [`ToolInvocation`].
    pub async fn invoke_call(&self, invocation: ToolInvocation) -> ToolResult {
        self.invoke(&invocation.name, invocation.params).await
    }

    /// Run one tool invocation. Never panics and never returns an error:
    /// every outcome is a [`ToolResult`].
    pub async fn invoke(&self, name: &str, raw_params: HashMap<String, Value>) -> ToolResult {
        let start = Instant::now();

        let Some(handler) = self.handlers.get(name) else {
            debug!(tool = %name, "Unknown tool requested");
            let result = ToolResult::failure(ToolFailure::unknown_tool(name, &self.tool_names()));
            self.log(name, &result, false, start.elapsed());
            return result;
        };
        let definition = handler.definition();

        let invocation = ToolInvocation::with_params(name, sanitize_params(raw_params));
        if let Err(violations) = self.validator.validate(&invocation, definition) {
            debug!(tool = %name, violations = violations.len(), "Invocation rejected by validation");
            let result = ToolResult::failure(ToolFailure::validation(&violations));
            self.log(name, &result, false, start.elapsed());
            return result;
        }

        let key = cache_key(name, &invocation.params);
        if let Some(cached) = self.cache.get(&key) {
            debug!(tool = %name, key = %key, "Cache hit");
            self.log(name, &cached, true, start.elapsed());
            return cached;
        }
        debug!(tool = %name, key = %key, "Cache miss");

        let result = self.run_handler(handler.as_ref(), &invocation).await;

        if let Some(ttl) = cache_ttl(&result, definition) {
            self.cache.set(key, result.clone(), Some(ttl));
        }

        self.log(name, &result, false, start.elapsed());
        result
    }

    /// Run the handler, converting every outcome into a [`ToolResult`].
    async fn run_handler(&self, handler: &dyn ToolHandler, invocation: &ToolInvocation) -> ToolResult {
        let outcome = AssertUnwindSafe(handler.handle(invocation))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(payload)) => ToolResult::success(payload),
            Ok(Err(err)) => normalize_error(&invocation.name, err),
            Err(panic) => {
                error!(
                    tool = %invocation.name,
                    panic = %panic_message(panic.as_ref()),
                    "Tool handler panicked"
                );
                ToolResult::failure(ToolFailure::internal())
            }
        }
    }

    fn log(&self, tool: &str, result: &ToolResult, cache_hit: bool, elapsed: Duration) {
        self.logger.record(&InvocationRecord {
            tool: tool.to_string(),
            outcome: result.outcome().to_string(),
            cache_hit,
            duration_ms: elapsed.as_millis() as u64,
        });
    }
}

/// Map an expected handler failure to its result kind.
fn normalize_error(tool: &str, err: HandlerError) -> ToolResult {
    let failure = match err {
        HandlerError::NotFound {
            message,
            suggestions,
        } => ToolFailure::not_found(message, &suggestions),
        HandlerError::Validation(violations) => ToolFailure::validation(&violations),
        HandlerError::CircuitOpen(dependency) => {
            debug!(tool = %tool, dependency = %dependency, "Rejected by open circuit");
            ToolFailure::circuit_open(&dependency)
        }
        HandlerError::Dependency {
            dependency,
            message,
        } => {
            warn!(tool = %tool, dependency = %dependency, error = %message, "Dependency call failed");
            ToolFailure::dependency(
                &dependency,
                format!("Dependency '{}' failed: {}", dependency, message),
            )
        }
        HandlerError::Internal(detail) => {
            error!(tool = %tool, error = %detail, "Tool handler failed");
            ToolFailure::internal()
        }
    };
    ToolResult::failure(failure)
}

/// TTL to cache `result` with, or `None` if it must not be cached.
fn cache_ttl(result: &ToolResult, definition: &ToolDefinition) -> Option<Duration> {
    match result {
        ToolResult::Success(_) => Some(definition.cache_policy.success_ttl),
        ToolResult::Failure(failure) if failure.kind.is_cacheable() => {
            Some(definition.cache_policy.failure_ttl)
        }
        ToolResult::Failure(_) => None,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
