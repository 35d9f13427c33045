//! Application layer for refdesk
//!
//! This crate contains the ports, the resilience services (TTL cache,
//! circuit breaker, sweeper) and the tool dispatcher.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod resilience;
pub mod use_cases;

// Re-export commonly used types
pub use config::ResilienceConfig;
pub use ports::{
    external_call::{ExternalCallError, ExternalCallPort, ExternalRequest, ExternalResponse},
    invocation_logger::{InvocationLogger, InvocationRecord, NoInvocationLogger},
    tool_handler::{HandlerError, ToolHandler},
};
pub use resilience::{
    BreakerError, BreakerRegistry, CacheSweeper, CircuitBreaker, DEFAULT_CLEANUP_INTERVAL,
    DEFAULT_TTL, GuardedDependency, TtlCache,
};
pub use use_cases::invoke_tool::{DispatcherError, ToolDispatcher};
